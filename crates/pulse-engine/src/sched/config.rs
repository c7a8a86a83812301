use crate::scene::Attribute;

/// Per-attribute switches deciding what the scheduler snapshots, blends and restores.
///
/// Defaults to position and rotation only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InterpolationConfig {
    pub position: bool,
    pub rotation: bool,
    pub size: bool,
    pub scale: bool,
    pub opacity: bool,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            position: true,
            rotation: true,
            size: false,
            scale: false,
            opacity: false,
        }
    }
}

impl InterpolationConfig {
    pub const fn none() -> Self {
        Self {
            position: false,
            rotation: false,
            size: false,
            scale: false,
            opacity: false,
        }
    }

    pub const fn all() -> Self {
        Self {
            position: true,
            rotation: true,
            size: true,
            scale: true,
            opacity: true,
        }
    }

    #[inline]
    pub fn is_enabled(&self, attr: Attribute) -> bool {
        match attr {
            Attribute::Position => self.position,
            Attribute::Rotation => self.rotation,
            Attribute::Size => self.size,
            Attribute::Scale => self.scale,
            Attribute::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, attr: Attribute, enabled: bool) {
        let slot = match attr {
            Attribute::Position => &mut self.position,
            Attribute::Rotation => &mut self.rotation,
            Attribute::Size => &mut self.size,
            Attribute::Scale => &mut self.scale,
            Attribute::Opacity => &mut self.opacity,
        };
        *slot = enabled;
    }

    #[inline]
    pub fn with(mut self, attr: Attribute, enabled: bool) -> Self {
        self.set(attr, enabled);
        self
    }

    /// Enabled attributes in [`Attribute::ALL`] order.
    pub fn enabled(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL.into_iter().filter(move |a| self.is_enabled(*a))
    }
}
