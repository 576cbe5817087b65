//! Sensor payload parsers.
//!
//! Pure functions operating on raw response bodies. No transport needed.
//!
//! | Resource | Body | Decoded |
//! |----------|------|---------|
//! | `sensors/sht21` | `"<t>;<h>"`, both integers | `t / 100` °C, `h / 100` %RH |
//! | `sensors/max44009` | decimal text | lux |

use crate::endpoint::{MAX44009_PATH, SHT21_PATH};
use crate::error::MalformedResponseError;

const CLIMATE_FIELDS: usize = 2;
const CLIMATE_SCALE: f64 = 100.0;

/// Temperature and humidity decoded from a single SHT21 response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

/// Parse an SHT21 body such as `"2350;4567"` into 23.50 °C / 45.67 %.
///
/// # Errors
///
/// Returns [`MalformedResponseError`] when the body is not UTF-8, does not
/// hold exactly two `;`-separated fields, or a field is not an integer.
pub fn parse_climate(body: &[u8]) -> Result<ClimateReading, MalformedResponseError> {
    let text = utf8(body, SHT21_PATH)?;

    let fields: Vec<&str> = text.trim().split(';').collect();
    let [temperature, humidity] = fields[..] else {
        return Err(MalformedResponseError::FieldCount {
            resource: SHT21_PATH,
            expected: CLIMATE_FIELDS,
            actual: fields.len(),
        });
    };

    Ok(ClimateReading {
        temperature: f64::from(parse_centi(temperature)?) / CLIMATE_SCALE,
        humidity: f64::from(parse_centi(humidity)?) / CLIMATE_SCALE,
    })
}

/// Parse a MAX44009 body (decimal text) into lux.
///
/// # Errors
///
/// Returns [`MalformedResponseError`] when the body is not UTF-8 or not a
/// finite number.
pub fn parse_light(body: &[u8]) -> Result<f64, MalformedResponseError> {
    let text = utf8(body, MAX44009_PATH)?.trim();
    text.parse::<f64>()
        .ok()
        .filter(|lux| lux.is_finite())
        .ok_or_else(|| MalformedResponseError::NotANumber {
            resource: MAX44009_PATH,
            value: text.to_string(),
        })
}

fn utf8<'a>(body: &'a [u8], resource: &'static str) -> Result<&'a str, MalformedResponseError> {
    std::str::from_utf8(body).map_err(|_| MalformedResponseError::NotUtf8 { resource })
}

fn parse_centi(field: &str) -> Result<i32, MalformedResponseError> {
    let field = field.trim();
    field
        .parse::<i32>()
        .map_err(|_| MalformedResponseError::NotANumber {
            resource: SHT21_PATH,
            value: field.to_string(),
        })
}
