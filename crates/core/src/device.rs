use scrolly_protocol::DeviceProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Paged by wheel and keyboard.
    Desktop,
    /// Scrolls natively; position follows section visibility.
    Mobile,
}

impl DeviceClass {
    /// Narrow viewports and touch-only pointers are mobile.
    pub fn classify(profile: &DeviceProfile, breakpoint_px: f64) -> Self {
        let narrow = profile.viewport_width < breakpoint_px;
        let touch_only = profile.coarse_pointer && !profile.can_hover;
        if narrow || touch_only {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_width_and_pointer() {
        assert_eq!(
            DeviceClass::classify(&DeviceProfile::desktop(1440.0), 768.0),
            DeviceClass::Desktop
        );
        assert_eq!(
            DeviceClass::classify(&DeviceProfile::desktop(600.0), 768.0),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::classify(&DeviceProfile::touch(1024.0), 768.0),
            DeviceClass::Mobile
        );
        // Touch laptop: coarse pointer but hover available.
        let hybrid = DeviceProfile {
            viewport_width: 1280.0,
            coarse_pointer: true,
            can_hover: true,
        };
        assert_eq!(DeviceClass::classify(&hybrid, 768.0), DeviceClass::Desktop);
    }

    #[test]
    fn breakpoint_is_exclusive() {
        assert_eq!(
            DeviceClass::classify(&DeviceProfile::desktop(768.0), 768.0),
            DeviceClass::Desktop
        );
    }
}
