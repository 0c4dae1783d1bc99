use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How one text field is sized on the badge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldStyle {
    /// Size tried first; the fitter only ever shrinks from here
    pub max_font_size_pt: f32,
    /// Region width as a fraction of the badge width
    pub width_ratio: f32,
    /// Region height is the badge height divided by this
    pub height_divisor: f32,
    /// Wrap at word boundaries to the region width
    pub multiline: bool,
}

impl FieldStyle {
    pub fn region_width_mm(&self, badge_width_mm: f32) -> f32 {
        badge_width_mm * self.width_ratio
    }

    pub fn region_height_mm(&self, badge_height_mm: f32) -> f32 {
        badge_height_mm / self.height_divisor
    }
}

/// Vertical offsets (mm from the badge top) for each field, keyed by which
/// fields are present.
///
/// When the name is missing, company and role keep the offsets they would
/// have alongside a name.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutPolicy {
    /// name, company, role
    pub all_three: [f32; 3],
    /// name, company
    pub name_company: [f32; 2],
    /// name, role
    pub name_role: [f32; 2],
    pub name_only: f32,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            all_three: [5.0, 60.0, 80.0],
            name_company: [10.0, 70.0],
            name_role: [10.0, 70.0],
            name_only: 30.0,
        }
    }
}

/// Resolved offsets for one badge; `None` means the field is not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldOffsets {
    pub name_mm: Option<f32>,
    pub company_mm: Option<f32>,
    pub role_mm: Option<f32>,
}

impl FieldOffsets {
    pub fn get(&self, field: Field) -> Option<f32> {
        match field {
            Field::Name => self.name_mm,
            Field::Company => self.company_mm,
            Field::Role => self.role_mm,
        }
    }
}

impl LayoutPolicy {
    pub fn offsets(&self, presence: Presence) -> FieldOffsets {
        let (name, company, role) = match (presence.company, presence.role) {
            (true, true) => (self.all_three[0], Some(self.all_three[1]), Some(self.all_three[2])),
            (true, false) => (self.name_company[0], Some(self.name_company[1]), None),
            (false, true) => (self.name_role[0], None, Some(self.name_role[1])),
            (false, false) => (self.name_only, None, None),
        };

        FieldOffsets {
            name_mm: presence.name.then_some(name),
            company_mm: company,
            role_mm: role,
        }
    }
}

/// Badge sheet configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BadgeOptions {
    // Sheet
    pub page_width_mm: f32,
    pub page_height_mm: f32,

    // Badge cell
    pub badge_width_mm: f32,
    pub badge_height_mm: f32,
    pub inner_margin_mm: f32,

    // Border
    pub border_color: RgbColor,
    pub border_width_pt: f32,

    // Text
    pub text_color: RgbColor,
    pub min_font_size_pt: f32,
    pub name: FieldStyle,
    pub company: FieldStyle,
    pub role: FieldStyle,
    pub layout: LayoutPolicy,
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            badge_width_mm: BADGE_WIDTH_MM,
            badge_height_mm: BADGE_HEIGHT_MM,
            inner_margin_mm: INNER_MARGIN_MM,
            border_color: RgbColor::gray(BORDER_GRAY),
            border_width_pt: BORDER_LINE_WIDTH,
            text_color: RgbColor::BLACK,
            min_font_size_pt: MIN_FONT_SIZE,
            name: FieldStyle {
                max_font_size_pt: 18.0,
                width_ratio: TEXT_WIDTH_RATIO,
                height_divisor: 3.0,
                multiline: true,
            },
            company: FieldStyle {
                max_font_size_pt: 16.0,
                width_ratio: TEXT_WIDTH_RATIO,
                height_divisor: 7.0,
                multiline: false,
            },
            role: FieldStyle {
                max_font_size_pt: 14.0,
                width_ratio: TEXT_WIDTH_RATIO,
                height_divisor: 7.0,
                multiline: false,
            },
            layout: LayoutPolicy::default(),
        }
    }
}

impl BadgeOptions {
    pub fn style(&self, field: Field) -> &FieldStyle {
        match field {
            Field::Name => &self.name,
            Field::Company => &self.company,
            Field::Role => &self.role,
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BadgeError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BadgeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let dimensions = [
            ("page width", self.page_width_mm),
            ("page height", self.page_height_mm),
            ("badge width", self.badge_width_mm),
            ("badge height", self.badge_height_mm),
        ];
        for (what, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(BadgeError::Config(format!(
                    "{} must be positive, got {}",
                    what, value
                )));
            }
        }

        if !(self.inner_margin_mm.is_finite() && self.inner_margin_mm >= 0.0) {
            return Err(BadgeError::Config(
                "Inner margin must not be negative".to_string(),
            ));
        }

        if self.badge_width_mm > self.page_width_mm || self.badge_height_mm > self.page_height_mm {
            return Err(BadgeError::Config(format!(
                "A {}x{}mm badge does not fit on a {}x{}mm page",
                self.badge_width_mm, self.badge_height_mm, self.page_width_mm, self.page_height_mm
            )));
        }

        if self.badge_width_mm + self.inner_margin_mm > self.page_width_mm
            || self.badge_height_mm + self.inner_margin_mm > self.page_height_mm
        {
            return Err(BadgeError::Config(format!(
                "No badge fits once the {}mm inner margin is added",
                self.inner_margin_mm
            )));
        }

        for field in Field::ALL {
            let style = self.style(field);
            if style.height_divisor <= 0.0 || style.width_ratio <= 0.0 {
                return Err(BadgeError::Config(format!(
                    "The {} region must have a positive size",
                    field.name()
                )));
            }
        }

        Ok(())
    }
}
