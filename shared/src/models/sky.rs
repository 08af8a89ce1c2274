//! Sky condition codes

/// Sky codes an hour may carry and still be flyable
pub const ACCEPTABLE_SKY_CODES: [&str; 4] = ["clearsky_day", "fair_day", "partlycloudy_day", "cloudy"];

/// Sky code used when a WMO code has no mapping
pub const UNKNOWN_SKY_CODE: &str = "unknown";

pub fn is_acceptable_sky_code(code: &str) -> bool {
    ACCEPTABLE_SKY_CODES.contains(&code)
}

/// Translate a WMO weather interpretation code into the short-range
/// series' sky code vocabulary
pub fn sky_code_from_wmo(wmo_code: u8, is_day: bool) -> &'static str {
    let day_night = |day: &'static str, night: &'static str| if is_day { day } else { night };

    match wmo_code {
        0 => day_night("clearsky_day", "clearsky_night"),
        1 => day_night("fair_day", "fair_night"),
        2 => day_night("partlycloudy_day", "partlycloudy_night"),
        3 => "cloudy",
        45 | 48 => "fog",
        51 | 61 => "lightrain",
        53 | 63 => "rain",
        55 | 65 => "heavyrain",
        56 | 66 => "lightsleet",
        57 | 67 => "sleet",
        71 => "lightsnow",
        73 | 77 => "snow",
        75 => "heavysnow",
        80 => day_night("lightrainshowers_day", "lightrainshowers_night"),
        81 => day_night("rainshowers_day", "rainshowers_night"),
        82 => day_night("heavyrainshowers_day", "heavyrainshowers_night"),
        85 => day_night("lightsnowshowers_day", "lightsnowshowers_night"),
        86 => day_night("heavysnowshowers_day", "heavysnowshowers_night"),
        95 => day_night(
            "lightrainshowersandthunder_day",
            "lightrainshowersandthunder_night",
        ),
        96 => day_night("sleetshowersandthunder_day", "sleetshowersandthunder_night"),
        99 => day_night(
            "heavysleetshowersandthunder_day",
            "heavysleetshowersandthunder_night",
        ),
        _ => UNKNOWN_SKY_CODE,
    }
}
