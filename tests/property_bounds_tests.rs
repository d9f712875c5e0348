use chart_kernel::core::{Bounds, Point, PolarScaler, PolarSettings, ScaleDirection, Scaler, Size};
use chart_kernel::core::ticks::tick_values;
use proptest::prelude::*;

proptest! {
    #[test]
    fn bounds_hold_the_extremes_of_finite_values(
        values in proptest::collection::vec(-1_000_000.0f64..1_000_000.0, 1..64)
    ) {
        let mut bounds = Bounds::empty();
        for value in &values {
            bounds.append_value(*value);
        }
        bounds.append_value(f64::NAN);
        bounds.append_value(f64::INFINITY);

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(!bounds.is_empty());
        prop_assert_eq!(bounds.min(), min);
        prop_assert_eq!(bounds.max(), max);
        prop_assert!(bounds.min() <= bounds.max());
    }

    #[test]
    fn merged_bounds_match_appending_everything(
        left in proptest::collection::vec(-1_000.0f64..1_000.0, 0..16),
        right in proptest::collection::vec(-1_000.0f64..1_000.0, 0..16)
    ) {
        let mut a = Bounds::empty();
        left.iter().for_each(|value| a.append_value(*value));
        let mut b = Bounds::empty();
        right.iter().for_each(|value| b.append_value(*value));
        let mut all = Bounds::empty();
        left.iter().chain(&right).for_each(|value| all.append_value(*value));

        a.merge(&b);
        prop_assert_eq!(a.is_empty(), all.is_empty());
        if !all.is_empty() {
            prop_assert_eq!(a.min(), all.min());
            prop_assert_eq!(a.max(), all.max());
        }
    }

    #[test]
    fn degenerate_expansion_always_opens_a_span(
        value in -1_000_000.0f64..1_000_000.0,
        ratio in 0.01f64..1.0,
        floor in 0.001f64..10.0
    ) {
        let mut bounds = Bounds::from_range(value, value);
        let c = bounds.degenerate_expansion(ratio, floor).expect("degenerate");
        bounds.extend_by(c, c);
        prop_assert!(c > 0.0);
        prop_assert!(bounds.min() < bounds.max());
        prop_assert!(bounds.degenerate_expansion(ratio, floor).is_none());
    }

    #[test]
    fn scaler_round_trip_property(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        factor in 0.0f64..1.0,
        inverted in any::<bool>(),
        vertical in any::<bool>()
    ) {
        let max = min + span;
        let value = min + factor * span;
        let direction = if vertical { ScaleDirection::Vertical } else { ScaleDirection::Horizontal };
        let scaler = Scaler::new(
            Point::new(12.0, 8.0),
            Size::new(2048.0, 1024.0),
            direction,
            min,
            max,
            inverted,
        )
        .expect("valid scaler");

        let px = scaler.to_pixels(value);
        let recovered = scaler.to_chart_values(px);
        prop_assert!((recovered - value).abs() <= 1e-7 * span.max(1.0));
    }

    #[test]
    fn polar_radius_stays_inside_the_ring(
        radius_factor in 0.0f64..1.0,
        angle in 0.0f64..359.0,
        inner in 0.0f64..100.0
    ) {
        let scaler = PolarScaler::new(
            Point::new(0.0, 0.0),
            Size::new(400.0, 300.0),
            (0.0, 360.0),
            (0.0, 50.0),
            PolarSettings { inner_radius: inner, ..PolarSettings::default() },
        )
        .expect("valid polar scaler");

        let pixel = scaler.to_pixels(angle, radius_factor * 50.0);
        let distance = pixel.distance_to(scaler.center());
        prop_assert!(distance >= scaler.inner_radius() - 1e-9);
        prop_assert!(distance <= scaler.outer_radius() + 1e-9);
    }

    #[test]
    fn ticks_are_ordered_multiples_inside_the_range(
        min in -10_000.0f64..10_000.0,
        span in 0.1f64..10_000.0,
        step_exp in -2i32..4
    ) {
        let step = 10f64.powi(step_exp);
        let max = min + span;
        let ticks = tick_values(min, max, step);
        for pair in ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for tick in &ticks {
            prop_assert!(*tick >= min - step * 1e-6);
            prop_assert!(*tick <= max + step * 1e-6);
        }
    }
}
