pub mod api_errors;
pub mod cancel;
pub mod checkout;
pub mod midtrans;
pub mod supabase_auth;
