//! Daily motivational quote rotation.
//!
//! One quote is selected per UTC day and served to every user until the next
//! midnight. Quotes that have never been shown are drawn first; after that,
//! selection is a weighted draw favoring quotes shown less often and longer
//! ago.

use crate::domain::models::quote::MotivationalQuote;
use chrono::{DateTime, Utc};
use rand::{distributions::WeightedIndex, prelude::*};

/// Pick the quote to show next. Returns `None` only for an empty pool.
pub fn pick_next(quotes: &[MotivationalQuote], now: DateTime<Utc>) -> Option<&MotivationalQuote> {
    let mut rng = rand::thread_rng();

    let never_shown: Vec<&MotivationalQuote> =
        quotes.iter().filter(|q| q.times_shown == 0).collect();
    if !never_shown.is_empty() {
        return never_shown.choose(&mut rng).copied();
    }

    let weights: Vec<u32> = quotes.iter().map(|q| selection_weight(q, now)).collect();
    // Errors only on an empty pool, since every weight is at least 1.
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(&quotes[dist.sample(&mut rng)])
}

/// Weight of one quote in the rotation draw. Starts at 100, loses up to 50
/// points for accumulated views, gains up to 50 for time since last shown.
/// Never below 1, so every active quote stays drawable.
pub fn selection_weight(quote: &MotivationalQuote, now: DateTime<Utc>) -> u32 {
    let mut weight = 100i64;
    weight -= (i64::from(quote.times_shown) * 5).min(50);
    weight += match quote.last_shown_at {
        Some(shown) => {
            let hours = (now - shown).num_seconds() as f64 / 3600.0;
            ((hours / 24.0 * 10.0) as i64).min(50)
        }
        None => 50,
    };
    weight.max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quote(id: i64, times_shown: i32, last_shown_at: Option<DateTime<Utc>>) -> MotivationalQuote {
        MotivationalQuote {
            id,
            quote: "No pain, no gain".to_string(),
            author: None,
            is_active: true,
            times_shown,
            last_shown_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn empty_pool_yields_nothing() {
        assert!(pick_next(&[], Utc::now()).is_none());
    }

    #[test]
    fn never_shown_quote_wins_over_heavily_shown() {
        let now = Utc::now();
        let pool = vec![
            quote(1, 12, Some(now - Duration::days(30))),
            quote(2, 0, None),
            quote(3, 3, Some(now - Duration::days(2))),
        ];
        for _ in 0..20 {
            assert_eq!(pick_next(&pool, now).unwrap().id, 2);
        }
    }

    #[test]
    fn view_count_lowers_weight() {
        let now = Utc::now();
        let shown_at = Some(now - Duration::hours(1));
        let fresh = selection_weight(&quote(1, 1, shown_at), now);
        let worn = selection_weight(&quote(2, 8, shown_at), now);
        assert!(worn < fresh);
    }

    #[test]
    fn staleness_raises_weight() {
        let now = Utc::now();
        let recent = selection_weight(&quote(1, 2, Some(now - Duration::hours(2))), now);
        let stale = selection_weight(&quote(2, 2, Some(now - Duration::days(4))), now);
        assert!(stale > recent);
    }

    #[test]
    fn weight_never_drops_below_one() {
        let now = Utc::now();
        let w = selection_weight(&quote(1, 1000, Some(now)), now);
        assert!(w >= 1);
    }

    #[test]
    fn view_count_penalty_is_capped() {
        let now = Utc::now();
        let shown_at = Some(now - Duration::hours(1));
        let ten = selection_weight(&quote(1, 10, shown_at), now);
        let hundred = selection_weight(&quote(2, 100, shown_at), now);
        assert_eq!(ten, hundred);
    }
}
