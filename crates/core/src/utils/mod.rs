pub mod file_store;
pub mod money;
pub mod time_utils;

pub use file_store::FileStore;
pub use money::{
    money_add, money_mul, money_sub, money_sum, round_money, validate_non_negative,
    validate_positive,
};
pub use time_utils::{add_months_clamped, today};
