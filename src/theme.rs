//! Visual themes: colors, typography and figure defaults.
//!
//! A [`Theme`] provides everything about a chart's appearance that is not
//! structural: background/text/grid colors, the series palette, font sizes
//! and the default canvas geometry. Styles decide *shape*, themes decide
//! *look*; no style ever carries a concrete color.

use std::collections::HashMap;
use std::sync::RwLock;

use log::warn;

use crate::error::ChartError;
use crate::plan::{Color, LinePattern};

/// A complete visual theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background_color: Color,
    pub text_color: Color,
    pub title_color: Color,
    pub grid_color: Color,
    pub axis_color: Color,
    /// Series palette, cycled when a chart has more series than entries.
    pub palette: Vec<Color>,
    pub font_family: String,
    /// Font sizes in points; pixel sizes derive from these via the DPI.
    pub title_font_size: f64,
    pub label_font_size: f64,
    pub tick_font_size: f64,
    pub legend_font_size: f64,
    pub value_font_size: f64,
    pub line_width: f64,
    pub grid_alpha: f64,
    pub grid_style: LinePattern,
    pub spine_visible: bool,
    /// Default figure size in inches (width, height).
    pub figsize: (f64, f64),
    pub dpi: u32,
}

impl Theme {
    /// Palette color for series `i`, cycling past the end. An empty palette
    /// (rejected at registration, but reachable through a hand-built theme)
    /// falls back to the text color.
    pub fn color(&self, i: usize) -> Color {
        if self.palette.is_empty() {
            return self.text_color;
        }
        self.palette[i % self.palette.len()]
    }

    /// Grid color with the theme's grid transparency applied.
    pub fn grid(&self) -> Color {
        self.grid_color.with_alpha(self.grid_alpha)
    }
}

fn base_theme(name: &str) -> Theme {
    Theme {
        name: name.to_string(),
        background_color: Color::rgb(255, 255, 255),
        text_color: Color::rgb(51, 51, 51),
        title_color: Color::rgb(26, 26, 26),
        grid_color: Color::rgb(229, 229, 229),
        axis_color: Color::rgb(102, 102, 102),
        palette: Vec::new(),
        font_family: "sans-serif".to_string(),
        title_font_size: 14.0,
        label_font_size: 12.0,
        tick_font_size: 10.0,
        legend_font_size: 10.0,
        value_font_size: 9.0,
        line_width: 2.0,
        grid_alpha: 0.7,
        grid_style: LinePattern::Solid,
        spine_visible: true,
        figsize: (10.0, 6.0),
        dpi: 150,
    }
}

/// The classic seaborn-like default: white background, muted palette.
fn theme_default() -> Theme {
    Theme {
        palette: vec![
            Color::rgb(76, 114, 176),  // steel blue (#4C72B0)
            Color::rgb(85, 168, 104),  // sage green (#55A868)
            Color::rgb(196, 78, 82),   // salmon red (#C44E52)
            Color::rgb(129, 114, 179), // lavender purple (#8172B3)
            Color::rgb(204, 185, 116), // goldenrod (#CCB974)
            Color::rgb(100, 181, 205), // sky blue (#64B5CD)
            Color::rgb(227, 119, 194), // orchid pink (#E377C2)
            Color::rgb(127, 127, 127), // medium gray (#7F7F7F)
        ],
        grid_alpha: 0.6,
        grid_style: LinePattern::Dashed,
        ..base_theme("default")
    }
}

fn theme_dark() -> Theme {
    Theme {
        background_color: Color::rgb(30, 30, 30),
        text_color: Color::rgb(224, 224, 224),
        title_color: Color::rgb(255, 255, 255),
        grid_color: Color::rgb(61, 61, 61),
        axis_color: Color::rgb(128, 128, 128),
        palette: vec![
            Color::rgb(93, 165, 218),  // bright blue (#5DA5DA)
            Color::rgb(96, 189, 104),  // lime green (#60BD68)
            Color::rgb(241, 88, 84),   // bright red (#F15854)
            Color::rgb(178, 118, 178), // bright purple (#B276B2)
            Color::rgb(222, 207, 63),  // yellow (#DECF3F)
            Color::rgb(77, 196, 255),  // electric blue (#4DC4FF)
            Color::rgb(241, 124, 176), // hot pink (#F17CB0)
            Color::rgb(178, 178, 178), // light gray (#B2B2B2)
        ],
        grid_alpha: 0.4,
        grid_style: LinePattern::Dotted,
        ..base_theme("dark")
    }
}

fn theme_light() -> Theme {
    Theme {
        background_color: Color::rgb(250, 250, 250),
        text_color: Color::rgb(66, 66, 66),
        title_color: Color::rgb(33, 33, 33),
        grid_color: Color::rgb(238, 238, 238),
        axis_color: Color::rgb(158, 158, 158),
        palette: vec![
            Color::rgb(25, 118, 210), // material blue (#1976D2)
            Color::rgb(56, 142, 60),  // material green (#388E3C)
            Color::rgb(211, 47, 47),  // material red (#D32F2F)
            Color::rgb(123, 31, 162), // material purple (#7B1FA2)
            Color::rgb(255, 160, 0),  // material amber (#FFA000)
            Color::rgb(0, 151, 167),  // material cyan (#0097A7)
            Color::rgb(194, 24, 91),  // material pink (#C2185B)
            Color::rgb(97, 97, 97),   // material gray (#616161)
        ],
        grid_alpha: 0.5,
        spine_visible: false,
        ..base_theme("light")
    }
}

fn theme_minimal() -> Theme {
    Theme {
        text_color: Color::rgb(85, 85, 85),
        title_color: Color::rgb(51, 51, 51),
        grid_color: Color::rgb(240, 240, 240),
        axis_color: Color::rgb(204, 204, 204),
        palette: vec![
            Color::rgb(46, 134, 171),  // ocean blue (#2E86AB)
            Color::rgb(162, 59, 114),  // berry (#A23B72)
            Color::rgb(241, 143, 1),   // orange (#F18F01)
            Color::rgb(199, 62, 29),   // vermilion (#C73E1D)
            Color::rgb(59, 31, 43),    // dark purple (#3B1F2B)
            Color::rgb(68, 175, 105),  // green (#44AF69)
            Color::rgb(110, 126, 133), // slate (#6E7E85)
            Color::rgb(184, 212, 227), // powder blue (#B8D4E3)
        ],
        title_font_size: 12.0,
        label_font_size: 10.0,
        tick_font_size: 9.0,
        legend_font_size: 9.0,
        line_width: 1.5,
        grid_alpha: 0.3,
        spine_visible: false,
        ..base_theme("minimal")
    }
}

fn theme_vibrant() -> Theme {
    Theme {
        text_color: Color::rgb(44, 62, 80),
        title_color: Color::rgb(26, 37, 47),
        grid_color: Color::rgb(236, 240, 241),
        axis_color: Color::rgb(127, 140, 141),
        palette: vec![
            Color::rgb(231, 76, 60),  // alizarin red (#E74C3C)
            Color::rgb(52, 152, 219), // peter river blue (#3498DB)
            Color::rgb(46, 204, 113), // emerald green (#2ECC71)
            Color::rgb(155, 89, 182), // amethyst purple (#9B59B6)
            Color::rgb(243, 156, 18), // sunflower yellow (#F39C12)
            Color::rgb(26, 188, 156), // turquoise (#1ABC9C)
            Color::rgb(233, 30, 99),  // pink (#E91E63)
            Color::rgb(0, 188, 212),  // cyan (#00BCD4)
        ],
        title_font_size: 16.0,
        line_width: 2.5,
        grid_alpha: 0.4,
        grid_style: LinePattern::Dashed,
        ..base_theme("vibrant")
    }
}

fn theme_plotly_dark() -> Theme {
    Theme {
        background_color: Color::rgb(17, 17, 17),
        text_color: Color::rgb(242, 245, 250),
        title_color: Color::rgb(242, 245, 250),
        grid_color: Color::rgb(40, 52, 66),
        axis_color: Color::rgb(80, 103, 132),
        palette: vec![
            Color::rgb(99, 110, 250),  // #636EFA
            Color::rgb(239, 85, 59),   // #EF553B
            Color::rgb(0, 204, 150),   // #00CC96
            Color::rgb(171, 99, 250),  // #AB63FA
            Color::rgb(255, 161, 90),  // #FFA15A
            Color::rgb(25, 211, 243),  // #19D3F3
            Color::rgb(255, 102, 146), // #FF6692
            Color::rgb(182, 232, 128), // #B6E880
            Color::rgb(255, 151, 255), // #FF97FF
            Color::rgb(254, 203, 82),  // #FECB52
        ],
        grid_alpha: 1.0,
        ..base_theme("plotly_dark")
    }
}

fn theme_vintage() -> Theme {
    Theme {
        background_color: Color::rgb(254, 248, 239),
        text_color: Color::rgb(51, 51, 51),
        title_color: Color::rgb(51, 51, 51),
        grid_color: Color::rgb(224, 217, 206),
        axis_color: Color::rgb(120, 116, 100),
        palette: vec![
            Color::rgb(216, 124, 124), // #D87C7C
            Color::rgb(145, 158, 139), // #919E8B
            Color::rgb(215, 171, 130), // #D7AB82
            Color::rgb(110, 112, 116), // #6E7074
            Color::rgb(97, 160, 168),  // #61A0A8
            Color::rgb(239, 161, 141), // #EFA18D
            Color::rgb(120, 116, 100), // #787464
            Color::rgb(204, 126, 99),  // #CC7E63
            Color::rgb(114, 78, 88),   // #724E58
            Color::rgb(75, 86, 91),    // #4B565B
        ],
        grid_alpha: 0.6,
        ..base_theme("vintage")
    }
}

fn theme_westeros() -> Theme {
    Theme {
        text_color: Color::rgb(81, 107, 145),
        title_color: Color::rgb(81, 107, 145),
        grid_color: Color::rgb(229, 235, 242),
        axis_color: Color::rgb(108, 128, 151),
        palette: vec![
            Color::rgb(81, 107, 145),  // #516B91
            Color::rgb(89, 196, 230),  // #59C4E6
            Color::rgb(237, 175, 218), // #EDAFDA
            Color::rgb(147, 183, 227), // #93B7E3
            Color::rgb(165, 231, 240), // #A5E7F0
            Color::rgb(203, 176, 227), // #CBB0E3
        ],
        grid_alpha: 0.6,
        ..base_theme("westeros")
    }
}

fn theme_essos() -> Theme {
    Theme {
        background_color: Color::rgb(255, 252, 245),
        text_color: Color::rgb(137, 52, 72),
        title_color: Color::rgb(137, 52, 72),
        grid_color: Color::rgb(240, 227, 210),
        axis_color: Color::rgb(166, 106, 94),
        palette: vec![
            Color::rgb(137, 52, 72),   // #893448
            Color::rgb(217, 88, 80),   // #D95850
            Color::rgb(235, 129, 70),  // #EB8146
            Color::rgb(255, 178, 72),  // #FFB248
            Color::rgb(242, 214, 67),  // #F2D643
            Color::rgb(235, 219, 164), // #EBDBA4
        ],
        grid_alpha: 0.6,
        ..base_theme("essos")
    }
}

fn theme_wonderland() -> Theme {
    Theme {
        text_color: Color::rgb(102, 102, 102),
        title_color: Color::rgb(102, 102, 102),
        grid_color: Color::rgb(235, 242, 240),
        axis_color: Color::rgb(144, 164, 174),
        palette: vec![
            Color::rgb(78, 163, 151),  // #4EA397
            Color::rgb(34, 195, 170),  // #22C3AA
            Color::rgb(123, 217, 165), // #7BD9A5
            Color::rgb(208, 100, 138), // #D0648A
            Color::rgb(245, 141, 178), // #F58DB2
            Color::rgb(242, 179, 201), // #F2B3C9
        ],
        grid_alpha: 0.6,
        ..base_theme("wonderland")
    }
}

fn theme_walden() -> Theme {
    Theme {
        text_color: Color::rgb(102, 102, 102),
        title_color: Color::rgb(102, 102, 102),
        grid_color: Color::rgb(232, 240, 246),
        axis_color: Color::rgb(108, 128, 151),
        palette: vec![
            Color::rgb(63, 177, 227),  // #3FB1E3
            Color::rgb(107, 230, 193), // #6BE6C1
            Color::rgb(98, 108, 145),  // #626C91
            Color::rgb(160, 167, 230), // #A0A7E6
            Color::rgb(196, 235, 173), // #C4EBAD
            Color::rgb(150, 222, 232), // #96DEE8
        ],
        grid_alpha: 0.6,
        ..base_theme("walden")
    }
}

fn theme_chalk() -> Theme {
    Theme {
        background_color: Color::rgb(41, 52, 65),
        text_color: Color::rgb(255, 255, 255),
        title_color: Color::rgb(255, 255, 255),
        grid_color: Color::rgb(72, 85, 99),
        axis_color: Color::rgb(170, 170, 170),
        palette: vec![
            Color::rgb(252, 151, 175), // #FC97AF
            Color::rgb(135, 247, 207), // #87F7CF
            Color::rgb(247, 244, 148), // #F7F494
            Color::rgb(114, 204, 255), // #72CCFF
            Color::rgb(247, 197, 160), // #F7C5A0
            Color::rgb(212, 164, 235), // #D4A4EB
            Color::rgb(210, 245, 166), // #D2F5A6
            Color::rgb(118, 242, 242), // #76F2F2
        ],
        grid_alpha: 0.5,
        grid_style: LinePattern::Dashed,
        ..base_theme("chalk")
    }
}

fn theme_macarons() -> Theme {
    Theme {
        text_color: Color::rgb(0, 128, 128),
        title_color: Color::rgb(0, 128, 128),
        grid_color: Color::rgb(230, 239, 239),
        axis_color: Color::rgb(0, 128, 128),
        palette: vec![
            Color::rgb(46, 199, 201),  // #2EC7C9
            Color::rgb(182, 162, 222), // #B6A2DE
            Color::rgb(90, 177, 239),  // #5AB1EF
            Color::rgb(255, 185, 128), // #FFB980
            Color::rgb(216, 122, 128), // #D87A80
            Color::rgb(141, 152, 179), // #8D98B3
            Color::rgb(229, 207, 13),  // #E5CF0D
            Color::rgb(151, 181, 82),  // #97B552
            Color::rgb(149, 112, 109), // #95706D
            Color::rgb(220, 105, 170), // #DC69AA
        ],
        grid_alpha: 0.6,
        ..base_theme("macarons")
    }
}

fn theme_roma() -> Theme {
    Theme {
        text_color: Color::rgb(0, 24, 82),
        title_color: Color::rgb(0, 24, 82),
        grid_color: Color::rgb(230, 230, 235),
        axis_color: Color::rgb(0, 24, 82),
        palette: vec![
            Color::rgb(224, 31, 84),   // #E01F54
            Color::rgb(0, 24, 82),     // #001852
            Color::rgb(245, 232, 200), // #F5E8C8
            Color::rgb(184, 210, 199), // #B8D2C7
            Color::rgb(198, 179, 142), // #C6B38E
            Color::rgb(164, 216, 194), // #A4D8C2
            Color::rgb(243, 217, 153), // #F3D999
            Color::rgb(211, 117, 143), // #D3758F
            Color::rgb(220, 195, 146), // #DCC392
            Color::rgb(46, 71, 131),   // #2E4783
        ],
        grid_alpha: 0.6,
        ..base_theme("roma")
    }
}

fn theme_shine() -> Theme {
    Theme {
        text_color: Color::rgb(51, 51, 51),
        title_color: Color::rgb(51, 51, 51),
        grid_color: Color::rgb(230, 230, 230),
        axis_color: Color::rgb(102, 102, 102),
        palette: vec![
            Color::rgb(193, 46, 52),  // #C12E34
            Color::rgb(230, 182, 0),  // #E6B600
            Color::rgb(0, 152, 217),  // #0098D9
            Color::rgb(43, 130, 29),  // #2B821D
            Color::rgb(0, 94, 170),   // #005EAA
            Color::rgb(51, 156, 168), // #339CA8
            Color::rgb(205, 168, 25), // #CDA819
            Color::rgb(50, 164, 135), // #32A487
        ],
        grid_alpha: 0.6,
        ..base_theme("shine")
    }
}

/// Registry of themes, keyed by lowercase name, preserving registration
/// order for listing. Shared behind a [`RwLock`] so custom themes can be
/// registered while other threads render.
#[derive(Debug)]
pub struct ThemeRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    map: HashMap<String, Theme>,
    order: Vec<String>,
}

impl ThemeRegistry {
    /// Registry pre-loaded with the built-in themes.
    pub fn with_builtins() -> Self {
        let reg = Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                order: Vec::new(),
            }),
        };
        for theme in [
            theme_default(),
            theme_dark(),
            theme_light(),
            theme_minimal(),
            theme_vibrant(),
            theme_plotly_dark(),
            theme_vintage(),
            theme_westeros(),
            theme_essos(),
            theme_wonderland(),
            theme_walden(),
            theme_chalk(),
            theme_macarons(),
            theme_roma(),
            theme_shine(),
        ] {
            reg.register(theme);
        }
        reg
    }

    /// Register a theme. An existing theme with the same name is replaced;
    /// its listing position is kept. Themes without a palette are refused:
    /// every consumer cycles the palette by index.
    pub fn register(&self, theme: Theme) {
        if theme.palette.is_empty() {
            warn!("ignoring theme '{}' with an empty palette", theme.name);
            return;
        }
        let key = theme.name.to_lowercase();
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.map.insert(key.clone(), theme).is_none() {
            inner.order.push(key);
        }
    }

    /// Look up a theme by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<Theme, ChartError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .map
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ChartError::UnknownTheme(name.to_string()))
    }

    /// Registered theme names, in registration order.
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.order.clone()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_the_advertised_set() {
        let reg = ThemeRegistry::with_builtins();
        let names = reg.names();
        assert!(names.len() >= 15);
        for expected in [
            "default",
            "dark",
            "light",
            "minimal",
            "vibrant",
            "plotly_dark",
            "vintage",
            "westeros",
            "essos",
            "wonderland",
            "walden",
            "chalk",
            "macarons",
            "roma",
            "shine",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = ThemeRegistry::with_builtins();
        let theme = reg.get("Dark").unwrap();
        assert_eq!(theme.name, "dark");
        assert!(reg.get("no-such-theme").is_err());
    }

    #[test]
    fn palette_cycles_past_the_end() {
        let theme = theme_default();
        let n = theme.palette.len();
        assert_eq!(theme.color(0), theme.color(n));
        assert_eq!(theme.color(1), theme.color(n + 1));
    }

    #[test]
    fn registering_overwrites_without_duplicating() {
        let reg = ThemeRegistry::with_builtins();
        let before = reg.names().len();
        let mut custom = theme_default();
        custom.name = "default".into();
        custom.dpi = 300;
        reg.register(custom);
        assert_eq!(reg.names().len(), before);
        assert_eq!(reg.get("default").unwrap().dpi, 300);
    }

    #[test]
    fn empty_palettes_are_refused_at_registration() {
        let reg = ThemeRegistry::with_builtins();
        let mut bad = theme_default();
        bad.name = "paletteless".into();
        bad.palette.clear();
        reg.register(bad);
        assert!(reg.get("paletteless").is_err());

        // A builtin is not clobbered by an invalid replacement either.
        let mut bad_default = theme_default();
        bad_default.palette.clear();
        reg.register(bad_default);
        assert!(!reg.get("default").unwrap().palette.is_empty());
    }

    #[test]
    fn hand_built_theme_without_palette_still_yields_colors() {
        let mut theme = theme_default();
        theme.palette.clear();
        assert_eq!(theme.color(0), theme.text_color);
        assert_eq!(theme.color(7), theme.text_color);
    }

    #[test]
    fn every_builtin_has_a_nonempty_palette() {
        let reg = ThemeRegistry::with_builtins();
        for name in reg.names() {
            let theme = reg.get(&name).unwrap();
            assert!(!theme.palette.is_empty(), "{name} has an empty palette");
            assert!(theme.dpi > 0);
            assert!(theme.figsize.0 > 0.0 && theme.figsize.1 > 0.0);
        }
    }
}
