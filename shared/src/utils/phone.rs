//! Phone number utilities

/// Number of trailing characters left visible by [`mask_phone`]
const VISIBLE_DIGITS: usize = 4;

/// Mask a phone number for logging, keeping only the last four characters
///
/// Recipients are opaque identifiers, so no format is assumed; numbers of
/// four characters or fewer are fully masked.
///
/// # Example
///
/// ```
/// use st_shared::utils::phone::mask_phone;
///
/// assert_eq!(mask_phone("+8613812345678"), "***5678");
/// assert_eq!(mask_phone("555"), "****");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= VISIBLE_DIGITS {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - VISIBLE_DIGITS..].iter().collect();
    format!("***{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("1234567890"), "***7890");
        assert_eq!(mask_phone("555-0100"), "***0100");
        assert_eq!(mask_phone("1234"), "****");
        assert_eq!(mask_phone(""), "****");
    }

    #[test]
    fn test_mask_phone_multibyte() {
        // Must not split inside a UTF-8 sequence
        assert_eq!(mask_phone("电话号码一二三四"), "***一二三四");
    }
}
