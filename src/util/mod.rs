#[cfg(test)]
pub mod hash;
#[cfg(test)]
pub mod lifecycle;
pub mod option;
pub mod panic;
pub mod result;
