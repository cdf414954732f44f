//! Randomized input generators

use fake::Fake;
use rust_decimal::Decimal;

use core_kernel::UserId;

/// A random principal in a realistic product range
pub fn random_principal() -> Decimal {
    Decimal::from((500_000..500_000_000i64).fake::<i64>())
}

/// A random term within the product's configured tiers
pub fn random_term_days() -> u32 {
    (1..90u32).fake::<u32>()
}

/// A batch of distinct user ids
pub fn user_batch(count: usize) -> Vec<UserId> {
    (0..count).map(|_| UserId::new()).collect()
}
