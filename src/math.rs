use core::ops::{Add, Div, Mul, Sub};
use num_traits::{clamp_max, clamp_min, FromPrimitive, ToPrimitive};

pub trait Number:
    Copy + Sub<Output = Self> + Add<Output = Self> + Div<Output = Self> + Mul<Output = Self>
    + PartialOrd + FromPrimitive + ToPrimitive
{
}

impl<T> Number for T where
    T: Copy + Sub<Output = T> + Add<Output = T> + Div<Output = T> + Mul<Output = T>
        + PartialOrd + FromPrimitive + ToPrimitive
{
}

// Take input max and/or min (bounds), output value within new bounds
pub struct Range<T>
where
    T: Number,
{
    min: T,
    max: T,
}

impl<T> Range<T>
where
    T: Number,
{
    pub const fn new(min: T, max: T) -> Self {
        Range { min, max }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn map_value_to_range(&self, val: T, new_range: &Range<T>) -> T {
        let scale = (new_range.max - new_range.min) / (self.max - self.min);

        (val - self.min) * scale + new_range.min
    }

    pub fn map_value_to_range_bounded(&self, val: T, new_range: &Range<T>) -> T {
        let clamped_val = clamp_min(clamp_max(val, self.max), self.min);

        self.map_value_to_range(clamped_val, new_range)
    }
}

#[test]
fn small_to_large() {
    let small = Range::new(0f32, 10f32);
    let large = Range::new(0f32, 50f32);
    assert_eq!(small.map_value_to_range(5f32, &large), 25f32);
}

#[test]
fn large_to_small() {
    let small = Range::new(0f32, 10f32);
    let large = Range::new(0f32, 50f32);
    assert_eq!(large.map_value_to_range(25f32, &small), 5f32);
}

#[test]
fn move_zero_point() {
    let small = Range::new(0f32, 10f32);
    let shifted = Range::new(10f32, 50f32);
    assert_eq!(small.map_value_to_range(5f32, &shifted), 30f32);
}

#[test]
fn bounded_map_clamps() {
    let gauge = Range::new(-4250f32, 4250f32);
    let unit = Range::new(0f32, 1f32);
    assert!(libm::fabsf(gauge.map_value_to_range_bounded(0f32, &unit) - 0.5) < 1e-6);
    assert_eq!(gauge.map_value_to_range_bounded(-9000f32, &unit), 0.0);
    assert!(libm::fabsf(gauge.map_value_to_range_bounded(9000f32, &unit) - 1.0) < 1e-6);
}
