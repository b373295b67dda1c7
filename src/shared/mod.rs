pub mod constants;
pub mod slug;
pub mod test_helpers;
