/// Color the surface is cleared to when no (or an unrecognized) color is given.
pub const DEFAULT_CLEAR_COLOR: ClearColor = ClearColor([0.07, 0.11, 0.18, 1.0]);

/// Straight-alpha RGBA clear color.
///
/// Invariant: exactly four channels, each in `[0, 1]`. The only constructor is
/// [`normalize`] (and the `From` conversions built on it), so the invariant
/// holds for every value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor([f64; 4]);

impl ClearColor {
    #[inline]
    pub fn r(self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn g(self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn b(self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn a(self) -> f64 {
        self.0[3]
    }

    /// Returns the channels by value.
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        self.0
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.0;
        wgpu::Color { r, g, b, a }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        DEFAULT_CLEAR_COLOR
    }
}

/// One loosely typed channel value.
///
/// Coercion follows dynamic-language number rules: booleans become 0/1, null
/// becomes 0, text is parsed as a decimal (or `0x` hex) literal after trimming
/// and anything unparsable becomes 0.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl ChannelValue {
    fn coerce(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(s) => coerce_text(s),
            Self::Null => 0.0,
        };
        if value.is_nan() { 0.0 } else { value }
    }
}

/// Every input encoding accepted by [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColorInput {
    /// Up to four channels; missing color channels default to 0, alpha to 1.
    Channels(Vec<ChannelValue>),
    /// `#rgb` or `#rrggbb`, case-insensitive.
    Text(String),
    /// Any other input; normalizes to [`DEFAULT_CLEAR_COLOR`].
    Other,
}

/// Converts any supported color input into a [`ClearColor`].
///
/// Total: malformed input yields [`DEFAULT_CLEAR_COLOR`] instead of failing.
pub fn normalize(input: impl Into<ColorInput>) -> ClearColor {
    match input.into() {
        ColorInput::Channels(values) => {
            let channel = |i: usize, default: f64| {
                values.get(i).map_or(default, ChannelValue::coerce).clamp(0.0, 1.0)
            };
            ClearColor([channel(0, 0.0), channel(1, 0.0), channel(2, 0.0), channel(3, 1.0)])
        }
        ColorInput::Text(text) => parse_hex(text.trim()).unwrap_or(DEFAULT_CLEAR_COLOR),
        ColorInput::Other => DEFAULT_CLEAR_COLOR,
    }
}

fn parse_hex(text: &str) -> Option<ClearColor> {
    let digits = text.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |pair: &str| u8::from_str_radix(pair, 16).ok().map(|v| f64::from(v) / 255.0);

    match digits.len() {
        3 => {
            let mut out = [1.0; 4];
            for (slot, digit) in out.iter_mut().zip(digits.chars()) {
                *slot = channel(&format!("{digit}{digit}"))?;
            }
            Some(ClearColor(out))
        }
        6 => Some(ClearColor([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
            1.0,
        ])),
        _ => None,
    }
}

fn coerce_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust also accepts `inf`/`nan` spellings; those are not numeric literals here.
    if text.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

impl From<f64> for ChannelValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for ChannelValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ChannelValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ChannelValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for ColorInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<ChannelValue>> for ColorInput {
    fn from(values: Vec<ChannelValue>) -> Self {
        Self::Channels(values)
    }
}

impl From<Vec<f64>> for ColorInput {
    fn from(values: Vec<f64>) -> Self {
        Self::Channels(values.into_iter().map(ChannelValue::Number).collect())
    }
}

impl From<&[f64]> for ColorInput {
    fn from(values: &[f64]) -> Self {
        Self::Channels(values.iter().copied().map(ChannelValue::Number).collect())
    }
}

impl<const N: usize> From<[f64; N]> for ColorInput {
    fn from(values: [f64; N]) -> Self {
        Self::from(values.as_slice())
    }
}

impl From<ClearColor> for ColorInput {
    fn from(color: ClearColor) -> Self {
        Self::from(color.0)
    }
}

impl From<wgpu::Color> for ColorInput {
    fn from(color: wgpu::Color) -> Self {
        Self::from([color.r, color.g, color.b, color.a])
    }
}

impl From<Option<ColorInput>> for ColorInput {
    fn from(value: Option<ColorInput>) -> Self {
        value.unwrap_or(Self::Other)
    }
}
