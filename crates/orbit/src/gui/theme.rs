use palette::{Srgb, Srgba, WithAlpha};

pub struct ThemeColors {
    pub ring: Srgba<f64>,
    pub divider: Srgba<f64>,
    pub center_circle: Srgba<f64>,
    pub center_hovered: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            ring: Srgba::new(0.11, 0.11, 0.12, 0.72),
            divider: Srgba::new(1.0, 1.0, 1.0, 0.08),
            center_circle: Srgba::new(1.0, 1.0, 1.0, 0.06),
            center_hovered: Srgba::new(1.0, 1.0, 1.0, 0.14),
        }
    }
}

impl ThemeColors {
    pub fn center_fill(&self, hovered: bool) -> Srgba<f64> {
        if hovered {
            self.center_hovered
        } else {
            self.center_circle
        }
    }

    /// Sector fill for a slot: the application's accent at `alpha`.
    pub fn highlight(&self, accent: Srgb<u8>, alpha: f64) -> Srgba<f64> {
        accent.into_format::<f64>().with_alpha(alpha.clamp(0.0, 1.0))
    }
}
