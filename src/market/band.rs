//! Price band math: deviation percentage and buy/sell classification

/// Direction in which the current price has left the band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviationKind {
    /// Price above the sell bound
    High,
    /// Price below the buy bound
    Low,
}

/// Deviation of the current price from the band, in percent of the crossed
/// bound, rounded to 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub percent: f64,
    pub kind: DeviationKind,
}

/// Buy/sell signal for a price relative to its band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandStatus {
    Buy,
    Sell,
}

impl BandStatus {
    pub fn label(self) -> &'static str {
        match self {
            BandStatus::Buy => "Buy",
            BandStatus::Sell => "Sell",
        }
    }
}

/// Percentage by which the current price exceeds the band.
///
/// Returns `None` when the price is absent, not a finite number, or inside
/// the inclusive band.
pub fn deviation(buy_price: f64, sell_price: f64, current: Option<f64>) -> Option<Deviation> {
    let price = current?;
    if !price.is_finite() || !buy_price.is_finite() || !sell_price.is_finite() {
        return None;
    }

    if price > sell_price {
        Some(Deviation {
            percent: round2((price - sell_price) / sell_price * 100.0),
            kind: DeviationKind::High,
        })
    } else if price < buy_price {
        Some(Deviation {
            percent: round2((buy_price - price) / buy_price * 100.0),
            kind: DeviationKind::Low,
        })
    } else {
        None
    }
}

/// Buy/sell signal for the current price.
///
/// The buy bound is checked first, so a degenerate band where the price
/// equals both bounds classifies as `Buy`.
pub fn band_status(buy_price: f64, sell_price: f64, current: Option<f64>) -> Option<BandStatus> {
    let price = current?;
    if !price.is_finite() {
        return None;
    }

    if price <= buy_price {
        Some(BandStatus::Buy)
    } else if price >= sell_price {
        Some(BandStatus::Sell)
    } else {
        None
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_above_sell_bound() {
        let dev = deviation(100.0, 120.0, Some(126.0)).unwrap();
        assert_eq!(dev.kind, DeviationKind::High);
        assert_eq!(dev.percent, 5.0);
    }

    #[test]
    fn test_deviation_below_buy_bound() {
        let dev = deviation(100.0, 120.0, Some(97.0)).unwrap();
        assert_eq!(dev.kind, DeviationKind::Low);
        assert_eq!(dev.percent, 3.0);
    }

    #[test]
    fn test_deviation_rounds_to_two_places() {
        // (130 - 120) / 120 * 100 = 8.3333...
        let dev = deviation(100.0, 120.0, Some(130.0)).unwrap();
        assert_eq!(dev.percent, 8.33);
    }

    #[test]
    fn test_deviation_inside_band_is_none() {
        assert!(deviation(100.0, 120.0, Some(100.0)).is_none());
        assert!(deviation(100.0, 120.0, Some(110.0)).is_none());
        assert!(deviation(100.0, 120.0, Some(120.0)).is_none());
    }

    #[test]
    fn test_deviation_absent_or_nan_price_is_none() {
        assert!(deviation(100.0, 120.0, None).is_none());
        assert!(deviation(100.0, 120.0, Some(f64::NAN)).is_none());
        assert!(deviation(f64::NAN, 120.0, Some(125.0)).is_none());
    }

    #[test]
    fn test_status_at_buy_bound() {
        assert_eq!(band_status(100.0, 120.0, Some(100.0)), Some(BandStatus::Buy));
    }

    #[test]
    fn test_status_above_sell_bound() {
        assert_eq!(
            band_status(100.0, 120.0, Some(125.0)),
            Some(BandStatus::Sell)
        );
    }

    #[test]
    fn test_status_inside_band_is_none() {
        assert_eq!(band_status(100.0, 120.0, Some(110.0)), None);
    }

    #[test]
    fn test_status_degenerate_band_favors_buy() {
        assert_eq!(band_status(100.0, 100.0, Some(100.0)), Some(BandStatus::Buy));
    }

    #[test]
    fn test_status_missing_price_is_none() {
        assert_eq!(band_status(100.0, 120.0, None), None);
        assert_eq!(band_status(100.0, 120.0, Some(f64::NAN)), None);
    }
}
