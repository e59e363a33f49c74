mod mock_sms_tests;
mod twilio_tests;
