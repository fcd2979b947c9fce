use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub conversion: ConversionConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct ConversionConfig {
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    pub path: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "voice-relay".to_string(),
            },
            audio: AudioConfig {
                recordings_path: "recordings".to_string(),
                sample_rate: 16_000,
                channels: 1,
            },
            conversion: ConversionConfig {
                endpoint: "http://localhost:8787/convert".to_string(),
            },
            cache: CacheConfig {
                path: "cache".to_string(),
            },
        }
    }
}
