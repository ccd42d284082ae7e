use combtune::microtone::MicrotoneArray;
use combtune::ratio::Ratio;
use serde::Deserialize;
use serde::Serialize;

use crate::App;
use crate::CliResult;

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum CombtuneDto {
    Scale(ScaleDto),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScaleDto {
    pub description: String,
    pub tones: Vec<ScaleToneDto>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScaleToneDto {
    pub index: usize,
    pub ratio: Option<String>,
    pub pitch: f64,
    pub cents: f64,
}

impl ScaleDto {
    pub fn from_scale(
        description: impl Into<String>,
        array: &MicrotoneArray,
        period: Ratio,
    ) -> ScaleDto {
        ScaleDto {
            description: description.into(),
            tones: array
                .iter()
                .enumerate()
                .map(|(index, tone)| ScaleToneDto {
                    index,
                    ratio: tone
                        .ratio()
                        .map(|(numer, denom)| format!("{}/{}", numer, denom)),
                    pitch: tone.pitch(),
                    cents: tone.pitch() * period.as_cents(),
                })
                .collect(),
        }
    }

    pub fn write(self, app: &mut App) -> CliResult<()> {
        let dto = CombtuneDto::Scale(self);
        app.write(
            serde_yaml::to_string(&dto)
                .map_err(|err| format!("Could not write scale dump: {}", err))?,
        )
        .map_err(Into::into)
    }
}
