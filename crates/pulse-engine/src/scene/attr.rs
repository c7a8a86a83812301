use crate::coords::Vec2;

/// Interpolatable attribute categories of a scene node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attribute {
    Position,
    Rotation,
    Size,
    Scale,
    Opacity,
}

impl Attribute {
    pub const COUNT: usize = 5;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Position,
        Attribute::Rotation,
        Attribute::Size,
        Attribute::Scale,
        Attribute::Opacity,
    ];

    /// Dense index, stable across releases. Used for per-node slot arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Attribute::Position => 0,
            Attribute::Rotation => 1,
            Attribute::Size => 2,
            Attribute::Scale => 3,
            Attribute::Opacity => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::Rotation => "rotation",
            Attribute::Size => "size",
            Attribute::Scale => "scale",
            Attribute::Opacity => "opacity",
        }
    }
}

/// Value of one attribute. Rotation and opacity are scalars; the rest are pairs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AttrValue {
    Scalar(f32),
    Vec2(Vec2),
}

impl AttrValue {
    /// `self + (to - self) * t`.
    ///
    /// Returns `None` when the two values have different shapes.
    #[inline]
    pub fn lerp(self, to: AttrValue, t: f32) -> Option<AttrValue> {
        match (self, to) {
            (AttrValue::Scalar(a), AttrValue::Scalar(b)) => Some(AttrValue::Scalar(a + (b - a) * t)),
            (AttrValue::Vec2(a), AttrValue::Vec2(b)) => Some(AttrValue::Vec2(a.lerp(b, t))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_match_all() {
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn scalar_lerp() {
        let v = AttrValue::Scalar(1.0).lerp(AttrValue::Scalar(3.0), 0.25);
        assert_eq!(v, Some(AttrValue::Scalar(1.5)));
    }

    #[test]
    fn vec2_lerp() {
        let a = AttrValue::Vec2(Vec2::new(0.0, 0.0));
        let b = AttrValue::Vec2(Vec2::new(10.0, -4.0));
        assert_eq!(a.lerp(b, 0.5), Some(AttrValue::Vec2(Vec2::new(5.0, -2.0))));
    }

    #[test]
    fn mismatched_shapes_do_not_blend() {
        let a = AttrValue::Scalar(0.0);
        let b = AttrValue::Vec2(Vec2::zero());
        assert_eq!(a.lerp(b, 0.5), None);
        assert_eq!(b.lerp(a, 0.5), None);
    }
}
