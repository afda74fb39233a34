pub mod account;
pub mod item;

#[cfg(test)]
mod test_util;
