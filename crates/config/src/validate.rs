//! Clamping validators for model tuning fields.
//!
//! Out-of-range values are pulled to the nearest bound rather than rejected,
//! so a hand-edited config file can never wedge the client.

use crate::schema::ModelConfig;

#[must_use]
pub fn clamp_temperature(value: f32) -> f32 {
    value.clamp(0.0, 2.0)
}

#[must_use]
pub fn clamp_top_p(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[must_use]
pub fn clamp_max_tokens(value: u32) -> u32 {
    value.clamp(1024, 512_000)
}

#[must_use]
pub fn clamp_presence_penalty(value: f32) -> f32 {
    value.clamp(-2.0, 2.0)
}

#[must_use]
pub fn clamp_frequency_penalty(value: f32) -> f32 {
    value.clamp(-2.0, 2.0)
}

#[must_use]
pub fn clamp_history_message_count(value: u32) -> u32 {
    value.min(64)
}

#[must_use]
pub fn clamp_compress_threshold(value: u32) -> u32 {
    value.clamp(500, 4000)
}

/// Pull every tuning field of `config` into range, in place.
pub fn normalize_model_config(config: &mut ModelConfig) {
    config.temperature = clamp_temperature(config.temperature);
    config.top_p = clamp_top_p(config.top_p);
    config.max_tokens = clamp_max_tokens(config.max_tokens);
    config.presence_penalty = clamp_presence_penalty(config.presence_penalty);
    config.frequency_penalty = clamp_frequency_penalty(config.frequency_penalty);
    config.history_message_count = clamp_history_message_count(config.history_message_count);
    config.compress_message_length_threshold =
        clamp_compress_threshold(config.compress_message_length_threshold);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_pull_to_nearest_bound() {
        assert_eq!(clamp_temperature(-1.0), 0.0);
        assert_eq!(clamp_temperature(9.0), 2.0);
        assert_eq!(clamp_top_p(1.5), 1.0);
        assert_eq!(clamp_max_tokens(1), 1024);
        assert_eq!(clamp_max_tokens(9_999_999), 512_000);
        assert_eq!(clamp_presence_penalty(-3.0), -2.0);
        assert_eq!(clamp_frequency_penalty(2.5), 2.0);
        assert_eq!(clamp_history_message_count(100), 64);
        assert_eq!(clamp_compress_threshold(100), 500);
    }

    #[test]
    fn in_range_values_pass_through() {
        assert_eq!(clamp_temperature(0.7), 0.7);
        assert_eq!(clamp_top_p(0.9), 0.9);
        assert_eq!(clamp_max_tokens(4000), 4000);
        assert_eq!(clamp_history_message_count(4), 4);
    }

    #[test]
    fn normalize_fixes_every_field() {
        let mut config = ModelConfig {
            temperature: 5.0,
            top_p: -0.5,
            max_tokens: 0,
            presence_penalty: 10.0,
            frequency_penalty: -10.0,
            history_message_count: 1000,
            compress_message_length_threshold: 1,
            ..ModelConfig::default()
        };
        normalize_model_config(&mut config);

        assert_eq!(config.temperature, 2.0);
        assert_eq!(config.top_p, 0.0);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.presence_penalty, 2.0);
        assert_eq!(config.frequency_penalty, -2.0);
        assert_eq!(config.history_message_count, 64);
        assert_eq!(config.compress_message_length_threshold, 500);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut config = ModelConfig {
            temperature: 3.0,
            ..ModelConfig::default()
        };
        normalize_model_config(&mut config);
        let once = config.clone();
        normalize_model_config(&mut config);
        assert_eq!(config, once);
    }
}
