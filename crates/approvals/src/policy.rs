//! Price-based gating rule.
//!
//! Given a proposed mutation, decide whether it can be applied to the catalog
//! right away, must wait in the approval queue, or is refused outright.
//!
//! | operation | refused when          | deferred when                                   |
//! |-----------|-----------------------|-------------------------------------------------|
//! | create    | price > creation cap  | price > review threshold                        |
//! | update    | never                 | price > current × ratio, or > review threshold  |
//! | delete    | never                 | always                                          |
//!
//! The creation cap only applies to creations: an update above the
//! cap is deferred like any other update above the review threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricegate_core::{DomainError, DomainResult};
use pricegate_products::ProductDetails;

/// Reason prefix for deferred creations; the review threshold is appended.
pub const CREATE_REASON_PREFIX: &str = "Creation: Price exceeds $";
pub const UPDATE_REASON: &str = "Update: Price change exceeds limit.";
pub const DELETE_REASON: &str = "Delete: Product marked for deletion.";

/// A mutation under evaluation.
///
/// Update and delete carry the product currently stored in the catalog, so the
/// caller must have resolved the target (or reported not-found) beforehand.
#[derive(Debug, Clone, Copy)]
pub enum ProposedMutation<'a> {
    Create {
        proposed: &'a ProductDetails,
    },
    Update {
        current: &'a ProductDetails,
        proposed: &'a ProductDetails,
    },
    Delete {
        current: &'a ProductDetails,
    },
}

/// Outcome of evaluating the gating rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatingDecision {
    /// Apply directly to the catalog.
    Apply,
    /// Record in the approval queue; do not touch the catalog.
    Defer { reason: String },
    /// Refuse entirely; nothing is queued or stored.
    Reject { reason: String },
}

impl GatingDecision {
    pub fn must_defer(&self) -> bool {
        matches!(self, GatingDecision::Defer { .. })
    }
}

/// Thresholds of the gating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePolicy {
    review_threshold: Decimal,
    creation_cap: Decimal,
    max_increase_ratio: Decimal,
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self {
            review_threshold: Decimal::new(5000, 0),
            creation_cap: Decimal::new(10000, 0),
            max_increase_ratio: Decimal::new(15, 1),
        }
    }
}

impl PricePolicy {
    pub fn new(
        review_threshold: Decimal,
        creation_cap: Decimal,
        max_increase_ratio: Decimal,
    ) -> DomainResult<Self> {
        if review_threshold < Decimal::ZERO {
            return Err(DomainError::validation("review threshold cannot be negative"));
        }
        if creation_cap < review_threshold {
            return Err(DomainError::validation(
                "creation cap must not be below the review threshold",
            ));
        }
        if max_increase_ratio < Decimal::ONE {
            return Err(DomainError::validation("max increase ratio must be at least 1"));
        }

        Ok(Self {
            review_threshold: review_threshold.normalize(),
            creation_cap: creation_cap.normalize(),
            max_increase_ratio,
        })
    }

    pub fn review_threshold(&self) -> Decimal {
        self.review_threshold
    }

    pub fn creation_cap(&self) -> Decimal {
        self.creation_cap
    }

    pub fn max_increase_ratio(&self) -> Decimal {
        self.max_increase_ratio
    }

    /// Evaluate the gating rule. Pure: reads nothing but its arguments.
    pub fn evaluate(&self, mutation: ProposedMutation<'_>) -> GatingDecision {
        match mutation {
            ProposedMutation::Create { proposed } => {
                if proposed.price > self.creation_cap {
                    GatingDecision::Reject {
                        reason: format!(
                            "Product price exceeds the maximum limit of ${}.",
                            with_thousands_separators(self.creation_cap)
                        ),
                    }
                } else if proposed.price > self.review_threshold {
                    GatingDecision::Defer {
                        reason: format!("{CREATE_REASON_PREFIX}{}.", self.review_threshold),
                    }
                } else {
                    GatingDecision::Apply
                }
            }
            ProposedMutation::Update { current, proposed } => {
                // An overflowing limit can only come from an absurd current price.
                let exceeds_ratio = current
                    .price
                    .checked_mul(self.max_increase_ratio)
                    .is_none_or(|limit| proposed.price > limit);

                if exceeds_ratio || proposed.price > self.review_threshold {
                    GatingDecision::Defer {
                        reason: UPDATE_REASON.to_string(),
                    }
                } else {
                    GatingDecision::Apply
                }
            }
            ProposedMutation::Delete { .. } => GatingDecision::Defer {
                reason: DELETE_REASON.to_string(),
            },
        }
    }
}

/// `10000` renders as `10,000`; any fractional part is kept as is.
fn with_thousands_separators(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(units: i64) -> ProductDetails {
        ProductDetails::new("Widget", Decimal::new(units, 0))
    }

    fn create(policy: &PricePolicy, units: i64) -> GatingDecision {
        policy.evaluate(ProposedMutation::Create {
            proposed: &priced(units),
        })
    }

    fn update(policy: &PricePolicy, from: i64, to: i64) -> GatingDecision {
        policy.evaluate(ProposedMutation::Update {
            current: &priced(from),
            proposed: &priced(to),
        })
    }

    #[test]
    fn create_at_or_below_threshold_applies() {
        let policy = PricePolicy::default();
        assert_eq!(create(&policy, 100), GatingDecision::Apply);
        assert_eq!(create(&policy, 5000), GatingDecision::Apply);
    }

    #[test]
    fn create_above_threshold_is_deferred_with_reason() {
        let policy = PricePolicy::default();
        assert_eq!(
            create(&policy, 6000),
            GatingDecision::Defer {
                reason: "Creation: Price exceeds $5000.".to_string()
            }
        );
        assert!(create(&policy, 10000).must_defer());
    }

    #[test]
    fn create_above_cap_is_rejected() {
        let policy = PricePolicy::default();
        match create(&policy, 10001) {
            GatingDecision::Reject { reason } => {
                assert_eq!(reason, "Product price exceeds the maximum limit of $10,000.")
            }
            other => panic!("expected Reject, got {other:?}"),
        }
    }

    #[test]
    fn cap_is_rendered_with_thousands_separators() {
        assert_eq!(with_thousands_separators(Decimal::new(999, 0)), "999");
        assert_eq!(with_thousands_separators(Decimal::new(1000, 0)), "1,000");
        assert_eq!(with_thousands_separators(Decimal::new(100000000, 2)), "1,000,000");
        assert_eq!(with_thousands_separators(Decimal::new(12345675, 1)), "1,234,567.5");
        assert_eq!(with_thousands_separators(Decimal::new(-25000, 0)), "-25,000");

        let policy =
            PricePolicy::new(Decimal::new(500, 0), Decimal::new(125000, 0), Decimal::ONE).unwrap();
        assert_eq!(
            create(&policy, 125001),
            GatingDecision::Reject {
                reason: "Product price exceeds the maximum limit of $125,000.".to_string()
            }
        );
    }

    #[test]
    fn create_threshold_uses_exact_decimals() {
        let policy = PricePolicy::default();
        let just_over = ProductDetails::new("Widget", Decimal::new(500001, 2));
        assert!(
            policy
                .evaluate(ProposedMutation::Create {
                    proposed: &just_over
                })
                .must_defer()
        );
    }

    #[test]
    fn update_over_one_and_a_half_times_is_deferred() {
        let policy = PricePolicy::default();
        assert_eq!(
            update(&policy, 1000, 1600),
            GatingDecision::Defer {
                reason: "Update: Price change exceeds limit.".to_string()
            }
        );
        assert_eq!(update(&policy, 1000, 1400), GatingDecision::Apply);
        // Exactly 1.5x is allowed.
        assert_eq!(update(&policy, 1000, 1500), GatingDecision::Apply);
    }

    #[test]
    fn update_above_threshold_is_deferred_even_for_small_change() {
        let policy = PricePolicy::default();
        assert!(update(&policy, 4900, 5100).must_defer());
    }

    #[test]
    fn update_above_creation_cap_is_deferred_not_rejected() {
        let policy = PricePolicy::default();
        assert!(update(&policy, 9000, 12000).must_defer());
    }

    #[test]
    fn update_price_decrease_applies() {
        let policy = PricePolicy::default();
        assert_eq!(update(&policy, 4000, 10), GatingDecision::Apply);
    }

    #[test]
    fn update_ratio_is_measured_against_current_price() {
        let policy = PricePolicy::default();
        // From zero, any increase exceeds 1.5x.
        assert!(update(&policy, 0, 1).must_defer());
        assert_eq!(update(&policy, 0, 0), GatingDecision::Apply);
    }

    #[test]
    fn delete_is_always_deferred() {
        let policy = PricePolicy::default();
        assert_eq!(
            policy.evaluate(ProposedMutation::Delete {
                current: &priced(1)
            }),
            GatingDecision::Defer {
                reason: "Delete: Product marked for deletion.".to_string()
            }
        );
    }

    #[test]
    fn custom_thresholds_flow_into_reason() {
        let policy =
            PricePolicy::new(Decimal::new(250000, 2), Decimal::new(3000, 0), Decimal::new(2, 0))
                .unwrap();
        assert_eq!(
            create(&policy, 2600),
            GatingDecision::Defer {
                reason: "Creation: Price exceeds $2500.".to_string()
            }
        );
        assert_eq!(update(&policy, 1000, 2000), GatingDecision::Apply);
    }

    #[test]
    fn inconsistent_thresholds_are_rejected() {
        assert!(PricePolicy::new(Decimal::new(100, 0), Decimal::new(50, 0), Decimal::ONE).is_err());
        assert!(
            PricePolicy::new(Decimal::new(100, 0), Decimal::new(500, 0), Decimal::new(9, 1))
                .is_err()
        );
        assert!(PricePolicy::new(Decimal::new(-1, 0), Decimal::new(5, 0), Decimal::ONE).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: create outcome is a function of price bands only.
            #[test]
            fn create_bands(cents in 0i64..2_000_000) {
                let policy = PricePolicy::default();
                let price = Decimal::new(cents, 2);
                let decision = policy.evaluate(ProposedMutation::Create {
                    proposed: &ProductDetails::new("p", price),
                });

                if price > Decimal::new(10000, 0) {
                    let rejected = matches!(decision, GatingDecision::Reject { .. });
                    prop_assert!(rejected);
                } else if price > Decimal::new(5000, 0) {
                    prop_assert!(decision.must_defer());
                } else {
                    prop_assert_eq!(decision, GatingDecision::Apply);
                }
            }

            /// Property: updates are never rejected, only applied or deferred.
            #[test]
            fn update_never_rejects(from in 0i64..2_000_000, to in 0i64..2_000_000) {
                let policy = PricePolicy::default();
                let current = ProductDetails::new("p", Decimal::new(from, 2));
                let proposed = ProductDetails::new("p", Decimal::new(to, 2));
                let decision = policy.evaluate(ProposedMutation::Update {
                    current: &current,
                    proposed: &proposed,
                });

                let expected_defer = proposed.price > current.price * Decimal::new(15, 1)
                    || proposed.price > Decimal::new(5000, 0);
                prop_assert_eq!(decision.must_defer(), expected_defer);
                let rejected = matches!(decision, GatingDecision::Reject { .. });
                prop_assert!(!rejected);
            }

            /// Property: deletes are deferred regardless of price.
            #[test]
            fn delete_always_defers(cents in 0i64..i64::MAX) {
                let policy = PricePolicy::default();
                let current = ProductDetails::new("p", Decimal::new(cents, 2));
                let decision = policy.evaluate(ProposedMutation::Delete { current: &current });
                prop_assert!(decision.must_defer());
            }
        }
    }
}
