use good_lp::Expression;

use crate::model::DeviationPair;

/// Equal-weight goal-programming objective: the plain sum of every
/// deviation variable the builder created. A unit of shortfall counts
/// the same as a unit of overshoot, whichever resource it belongs to.
pub fn total_deviation(pairs: &[DeviationPair], budget_pair: Option<&DeviationPair>) -> Expression {
    let mut total = Expression::from(0);
    for pair in pairs {
        total += pair.over;
        total += pair.under;
    }
    if let Some(pair) = budget_pair {
        total += pair.over;
        total += pair.under;
    }
    total
}
