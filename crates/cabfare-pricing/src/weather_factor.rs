/// Condition keywords and their surcharge, most severe first.
/// The first keyword contained in the condition text wins.
pub const WEATHER_FACTORS: &[(&str, f64)] = &[
    ("thunderstorm", 1.40),
    ("snow", 1.30),
    ("rain", 1.20),
    ("fog", 1.15),
    ("mist", 1.15),
    ("cloud", 1.10),
    ("clear", 1.00),
];

/// Factor for conditions matching no keyword.
pub const DEFAULT_WEATHER_FACTOR: f64 = 1.05;

/// Surcharge multiplier for a free-text weather condition.
pub fn weather_factor(condition: &str) -> f64 {
    let condition = condition.to_lowercase();
    WEATHER_FACTORS
        .iter()
        .find(|(keyword, _)| condition.contains(keyword))
        .map(|&(_, factor)| factor)
        .unwrap_or(DEFAULT_WEATHER_FACTOR)
}
