//! Built-in driver tables.
//!
//! Pure product data: one descriptor per model family, registered under
//! exact model ids or family prefixes. This is deliberately a
//! representative table set, not an exhaustive transcription of every
//! firmware revision; adding a model means adding data here, not code.

mod airdog;
mod airfresh;
mod airpurifier;
mod dehumidifier;
mod fan;
mod humidifier;

use crate::registry::{DriverRegistry, RegistryError};

// Air purifiers
pub const MODEL_AIRPURIFIER_V3: &str = "zhimi.airpurifier.v3";
pub const MODEL_AIRPURIFIER_PRO: &str = "zhimi.airpurifier.v6";
pub const MODEL_AIRPURIFIER_PRO_V7: &str = "zhimi.airpurifier.v7";
pub const MODEL_AIRPURIFIER_2S: &str = "zhimi.airpurifier.mc1";
pub const MODEL_AIRPURIFIER_3: &str = "zhimi.airpurifier.ma4";
pub const MODEL_AIRPURIFIER_3H: &str = "zhimi.airpurifier.mb3";
pub const PREFIX_AIRPURIFIER: &str = "zhimi.airpurifier.";

// Humidifiers
pub const MODEL_AIRHUMIDIFIER_CA1: &str = "zhimi.humidifier.ca1";
pub const MODEL_AIRHUMIDIFIER_CB1: &str = "zhimi.humidifier.cb1";
pub const MODEL_AIRHUMIDIFIER_CA4: &str = "zhimi.humidifier.ca4";
pub const MODEL_AIRHUMIDIFIER_MJJSQ: &str = "deerma.humidifier.mjjsq";
pub const MODEL_AIRHUMIDIFIER_JSQ1: &str = "deerma.humidifier.jsq1";
pub const MODEL_AIRHUMIDIFIER_JSQ001: &str = "shuii.humidifier.jsq001";
pub const PREFIX_AIRHUMIDIFIER: &str = "zhimi.humidifier.";

// Air freshers
pub const MODEL_AIRFRESH_T2017: &str = "dmaker.airfresh.t2017";
pub const PREFIX_AIRFRESH: &str = "zhimi.airfresh.";

// Pedestal fans
pub const MODEL_FAN_P5: &str = "dmaker.fan.p5";
pub const MODEL_FAN_P9: &str = "dmaker.fan.p9";
pub const MODEL_FAN_P10: &str = "dmaker.fan.p10";
pub const MODEL_FAN_P11: &str = "dmaker.fan.p11";
pub const PREFIX_FAN: &str = "zhimi.fan.";

// Airdog purifiers
pub const MODEL_AIRDOG_X3: &str = "airdog.airpurifier.x3";
pub const MODEL_AIRDOG_X5: &str = "airdog.airpurifier.x5";
pub const MODEL_AIRDOG_X7SM: &str = "airdog.airpurifier.x7sm";

// Dehumidifiers
pub const PREFIX_DEHUMIDIFIER: &str = "nwt.derh.";

/// Build the registry of all built-in drivers.
///
/// Every descriptor is validated against its declared snapshot schema
/// on the way in; an error here is a defect in the tables above.
pub fn builtin_registry() -> Result<DriverRegistry, RegistryError> {
    let mut registry = DriverRegistry::new();

    // Exact ids take priority over the family prefixes below.
    registry.register_model(MODEL_AIRPURIFIER_V3, airpurifier::v3())?;
    registry.register_model(MODEL_AIRPURIFIER_PRO, airpurifier::pro())?;
    registry.register_model(MODEL_AIRPURIFIER_PRO_V7, airpurifier::pro_v7())?;
    registry.register_model(MODEL_AIRPURIFIER_2S, airpurifier::two_s())?;
    let purifier_miot = airpurifier::miot();
    registry.register_model(MODEL_AIRPURIFIER_3, purifier_miot.clone())?;
    registry.register_model(MODEL_AIRPURIFIER_3H, purifier_miot)?;
    registry.register_prefix(PREFIX_AIRPURIFIER, airpurifier::generic())?;

    let humidifier_ca_cb = humidifier::ca_cb();
    registry.register_model(MODEL_AIRHUMIDIFIER_CA1, humidifier_ca_cb.clone())?;
    registry.register_model(MODEL_AIRHUMIDIFIER_CB1, humidifier_ca_cb)?;
    registry.register_model(MODEL_AIRHUMIDIFIER_CA4, humidifier::ca4())?;
    let humidifier_mjjsq = humidifier::mjjsq();
    registry.register_model(MODEL_AIRHUMIDIFIER_MJJSQ, humidifier_mjjsq.clone())?;
    registry.register_model(MODEL_AIRHUMIDIFIER_JSQ1, humidifier_mjjsq)?;
    registry.register_model(MODEL_AIRHUMIDIFIER_JSQ001, humidifier::jsq())?;
    registry.register_prefix(PREFIX_AIRHUMIDIFIER, humidifier::generic())?;

    registry.register_model(MODEL_AIRFRESH_T2017, airfresh::t2017())?;
    registry.register_prefix(PREFIX_AIRFRESH, airfresh::va2())?;

    registry.register_model(MODEL_FAN_P5, fan::p5())?;
    let fan_miot = fan::miot();
    registry.register_model(MODEL_FAN_P9, fan_miot.clone())?;
    registry.register_model(MODEL_FAN_P10, fan_miot.clone())?;
    registry.register_model(MODEL_FAN_P11, fan_miot)?;
    registry.register_prefix(PREFIX_FAN, fan::legacy())?;

    let airdog = airdog::x_series();
    registry.register_model(MODEL_AIRDOG_X3, airdog.clone())?;
    registry.register_model(MODEL_AIRDOG_X5, airdog.clone())?;
    registry.register_model(MODEL_AIRDOG_X7SM, airdog)?;

    registry.register_prefix(PREFIX_DEHUMIDIFIER, dehumidifier::generic())?;

    Ok(registry)
}
