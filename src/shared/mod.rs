pub mod constants;
#[cfg(test)]
pub mod test_helpers;
pub mod timestamp;
