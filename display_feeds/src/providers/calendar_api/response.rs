use serde::Deserialize;

use crate::{
    models::calendar::{Countdown, LunarDate},
    providers::ProviderError,
};

#[derive(Deserialize, Debug)]
pub struct CountdownResponse {
    pub days: i64,
}

#[derive(Deserialize, Debug)]
pub struct LunarResponse {
    pub day: u32,
    pub month: u32,
    pub cycle: String,
}

pub fn parse_countdown(body: &str) -> Result<Countdown, ProviderError> {
    let resp: CountdownResponse = serde_json::from_str(body)?;
    if resp.days < 0 {
        return Err(ProviderError::Decode(format!(
            "countdown cannot be negative, got {}",
            resp.days
        )));
    }
    Ok(Countdown { days: resp.days })
}

pub fn parse_lunar(body: &str) -> Result<LunarDate, ProviderError> {
    let resp: LunarResponse = serde_json::from_str(body)?;
    if !(1..=30).contains(&resp.day) || !(1..=12).contains(&resp.month) {
        return Err(ProviderError::Decode(format!(
            "lunar date out of range: {}/{}",
            resp.day, resp.month
        )));
    }
    Ok(LunarDate {
        day: resp.day,
        month: resp.month,
        cycle: resp.cycle,
    })
}
