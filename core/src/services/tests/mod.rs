//! Tests for the issuance and verification engines
