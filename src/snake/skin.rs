use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::food::FoodKind;

/// A CSS-style color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Hex(&'static str),
    /// Hue in degrees, saturation and lightness in percent.
    Hsl(u16, u8, u8),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(s) => f.write_str(s),
            Color::Hsl(h, s, l) => write!(f, "hsl({h}, {s}%, {l}%)"),
        }
    }
}

/// Board colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub food: Color,
    pub head: Color,
    pub body: Color,
    /// Lighter outline drawn around the head by the classic skin.
    pub head_border: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Night,
    Garden,
    Space,
    Retro,
}

impl Theme {
    pub const ALL: [Theme; 5] = [Theme::Default, Theme::Night, Theme::Garden, Theme::Space, Theme::Retro];

    pub fn palette(self) -> Palette {
        use Color::Hex;
        match self {
            Theme::Default => Palette {
                background: Hex("#1a1a2e"),
                grid: Hex("#16213e"),
                food: Hex("#ff6b6b"),
                head: Hex("#4ecdc4"),
                body: Hex("#45b7b8"),
                head_border: Hex("#6ef0f0"),
            },
            Theme::Night => Palette {
                background: Hex("#0a0a1a"),
                grid: Hex("#1a1a3a"),
                food: Hex("#ff6b6b"),
                head: Hex("#6c5ce7"),
                body: Hex("#5f4dee"),
                head_border: Hex("#a29bfe"),
            },
            Theme::Garden => Palette {
                background: Hex("#2d5016"),
                grid: Hex("#1a3009"),
                food: Hex("#ff6b6b"),
                head: Hex("#51cf66"),
                body: Hex("#40c057"),
                head_border: Hex("#69db7c"),
            },
            Theme::Space => Palette {
                background: Hex("#000814"),
                grid: Hex("#001d3d"),
                food: Hex("#ff6b6b"),
                head: Hex("#4a90e2"),
                body: Hex("#357abd"),
                head_border: Hex("#6bb3ff"),
            },
            Theme::Retro => Palette {
                background: Hex("#1e3a1e"),
                grid: Hex("#0f1f0f"),
                food: Hex("#00ff41"),
                head: Hex("#00ff41"),
                body: Hex("#00cc33"),
                head_border: Hex("#00ff88"),
            },
        }
    }

    /// Fill color for a food item; special kinds ignore the theme.
    pub fn food_color(self, kind: FoodKind) -> Color {
        match kind {
            FoodKind::Normal => self.palette().food,
            FoodKind::Golden => Color::Hex("#ffd700"),
            FoodKind::BluePotion => Color::Hex("#4a90e2"),
            FoodKind::RedPotion => Color::Hex("#e74c3c"),
            FoodKind::Scissors => Color::Hex("#95a5a6"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "night" => Ok(Theme::Night),
            "garden" => Ok(Theme::Garden),
            "space" => Ok(Theme::Space),
            "retro" => Ok(Theme::Retro),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// How the snake itself is drawn, layered over a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    /// Theme colors.
    #[default]
    Classic,
    /// Hue cycles with the frame counter and along the body.
    Rainbow,
    /// Greys, alternating along the body.
    Robot,
}

#[inline]
fn hue(frame: u64, offset: u64) -> u16 {
    ((frame * 2 + offset) % 360) as u16
}

impl Skin {
    pub fn head(self, theme: Theme, frame: u64) -> Color {
        match self {
            Skin::Classic => theme.palette().head,
            Skin::Rainbow => Color::Hsl(hue(frame, 0), 70, 60),
            Skin::Robot => Color::Hex("#e0e0e0"),
        }
    }

    pub fn head_border(self, theme: Theme, frame: u64) -> Color {
        match self {
            Skin::Classic => theme.palette().head_border,
            Skin::Rainbow => Color::Hsl(hue(frame, 30), 90, 70),
            Skin::Robot => Color::Hex("#ffffff"),
        }
    }

    /// Color of body segment `index`, where the head is index 0.
    pub fn body(self, theme: Theme, frame: u64, index: usize) -> Color {
        match self {
            Skin::Classic => theme.palette().body,
            Skin::Rainbow => Color::Hsl(hue(frame, index as u64 * 30), 70, 50),
            Skin::Robot if index % 2 == 0 => Color::Hex("#808080"),
            Skin::Robot => Color::Hex("#a0a0a0"),
        }
    }
}

impl FromStr for Skin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Skin::Classic),
            "rainbow" => Ok(Skin::Rainbow),
            "robot" => Ok(Skin::Robot),
            other => Err(format!("unknown skin '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_follows_theme() {
        for theme in Theme::ALL {
            let p = theme.palette();
            assert_eq!(Skin::Classic.head(theme, 99), p.head);
            assert_eq!(Skin::Classic.body(theme, 99, 4), p.body);
            assert_eq!(Skin::Classic.head_border(theme, 0), p.head_border);
        }
        assert_eq!(Skin::Classic.head_border(Theme::Retro, 0).to_string(), "#00ff88");
    }

    #[test]
    fn rainbow_hue_cycles() {
        assert_eq!(Skin::Rainbow.head(Theme::Default, 0).to_string(), "hsl(0, 70%, 60%)");
        assert_eq!(Skin::Rainbow.head(Theme::Default, 185), Color::Hsl(10, 70, 60));
        assert_eq!(Skin::Rainbow.head_border(Theme::Night, 170), Color::Hsl(10, 90, 70));
        assert_eq!(Skin::Rainbow.body(Theme::Default, 1, 2), Color::Hsl(62, 70, 50));
    }

    #[test]
    fn robot_alternates() {
        let a = Skin::Robot.body(Theme::Space, 0, 1);
        let b = Skin::Robot.body(Theme::Space, 0, 2);
        assert_ne!(a, b);
        assert_eq!(a, Skin::Robot.body(Theme::Garden, 7, 3));
    }

    #[test]
    fn special_food_ignores_theme() {
        assert_eq!(Theme::Retro.food_color(FoodKind::Normal).to_string(), "#00ff41");
        assert_eq!(Theme::Retro.food_color(FoodKind::Golden), Theme::Night.food_color(FoodKind::Golden));
    }

    #[test]
    fn names_parse() {
        assert_eq!("Garden".parse::<Theme>(), Ok(Theme::Garden));
        assert_eq!("robot".parse::<Skin>(), Ok(Skin::Robot));
        assert!("neon".parse::<Skin>().is_err());
    }
}
