//! The configuration surface of §6: per-class scheduling parameters, the
//! burst class, and link settings. Populated once at start-up by the
//! (external) terminal collaborator and consumed by the core; [`validate`]
//! is the check that collaborator is expected to run before installing a
//! configuration, so the core never re-derives "is this a legal period" at
//! the call site.

use bitflags::bitflags;

use linksched_wire::DataType;

/// Reason a [`SchedulerConfig`] was rejected by [`SchedulerConfig::validate`].
/// Describes the first out-of-range field encountered, not every violation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    PeriodOutOfRange { class: usize },
    DeadlineRatioOutOfRange { class: usize },
    PacketCountOutOfRange { class: usize },
    ProcessingThresholdOutOfRange,
    BurstIntervalOrder,
    TxPowerOutOfRange,
}

/// Per-class periodic scheduling parameters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ClassConfig {
    pub period_ms: u32,
    pub deadline_ms: u32,
    pub data_type: DataType,
    pub packet_count: u16,
}

impl ClassConfig {
    fn validate(&self, class: usize) -> Result<(), ConfigError> {
        if !(100..=10_000).contains(&self.period_ms) {
            return Err(ConfigError::PeriodOutOfRange { class });
        }
        let ratio = self.deadline_ms as f32 / self.period_ms as f32;
        if !(0.8..=4.0).contains(&ratio) {
            return Err(ConfigError::DeadlineRatioOutOfRange { class });
        }
        if !(1..=200).contains(&self.packet_count) {
            return Err(ConfigError::PacketCountOutOfRange { class });
        }
        Ok(())
    }
}

/// Parameters for the bursty `Crand` aspiration class (§4.5).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BurstConfig {
    pub enabled: bool,
    pub min_interval_ms: u32,
    pub max_interval_ms: u32,
    pub burst_activation_ms: u32,
    pub burst_interval_ms: u32,
    pub burst_duration_ms: u32,
    pub element_count: u16,
    pub data_type: DataType,
    pub relative_deadline_ms: u32,
}

impl BurstConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms > self.max_interval_ms || self.burst_interval_ms > self.min_interval_ms
        {
            return Err(ConfigError::BurstIntervalOrder);
        }
        Ok(())
    }
}

/// Radio power-save state, as carried in the 802.11 config surface.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PowerSaveMode {
    None,
    MinModem,
    MaxModem,
}

bitflags! {
    /// Which 802.11 protocol generations are enabled on the link.
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct ProtocolBitmap: u8 {
        const PROTOCOL_11B = 0b001;
        const PROTOCOL_11G = 0b010;
        const PROTOCOL_11N = 0b100;
    }
}

/// Link-level settings, independent of any one traffic class.
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    /// TX power in 0.25 dBm units, `[8, 84]`.
    pub tx_power: u8,
    pub power_save_mode: PowerSaveMode,
    pub protocol_bitmap: ProtocolBitmap,
    pub disable_11b_rates: bool,
    pub auto_tx_power: bool,
    pub auto_tx_power_interval_ms: u32,
}

impl LinkConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(8..=84).contains(&self.tx_power) {
            return Err(ConfigError::TxPowerOutOfRange);
        }
        Ok(())
    }
}

/// The whole configuration surface consumed by the core at start-up.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub classes: [ClassConfig; 3],
    pub burst: BurstConfig,
    pub processing_threshold_ms: u32,
    pub link: LinkConfig,
}

impl SchedulerConfig {
    /// Validates every numeric range from §6, stopping at (and reporting)
    /// the first violation found, in class order then burst then link.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, class) in self.classes.iter().enumerate() {
            class.validate(index)?;
        }
        self.burst.validate()?;
        if !(50..=15_000).contains(&self.processing_threshold_ms) {
            return Err(ConfigError::ProcessingThresholdOutOfRange);
        }
        self.link.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SchedulerConfig {
        let class = ClassConfig {
            period_ms: 1000,
            deadline_ms: 1500,
            data_type: DataType::I32,
            packet_count: 10,
        };
        SchedulerConfig {
            classes: [class; 3],
            burst: BurstConfig {
                enabled: true,
                min_interval_ms: 2000,
                max_interval_ms: 5000,
                burst_activation_ms: 60_000,
                burst_interval_ms: 500,
                burst_duration_ms: 5000,
                element_count: 10,
                data_type: DataType::F32,
                relative_deadline_ms: 1000,
            },
            processing_threshold_ms: 200,
            link: LinkConfig {
                tx_power: 40,
                power_save_mode: PowerSaveMode::None,
                protocol_bitmap: ProtocolBitmap::PROTOCOL_11G | ProtocolBitmap::PROTOCOL_11N,
                disable_11b_rates: false,
                auto_tx_power: true,
                auto_tx_power_interval_ms: 5000,
            },
        }
    }

    #[test]
    fn accepts_well_formed_config() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn rejects_period_out_of_range() {
        let mut config = valid_config();
        config.classes[1].period_ms = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodOutOfRange { class: 1 })
        );
    }

    #[test]
    fn rejects_deadline_ratio_out_of_range() {
        let mut config = valid_config();
        config.classes[0].deadline_ms = 100_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DeadlineRatioOutOfRange { class: 0 })
        );
    }

    #[test]
    fn rejects_packet_count_out_of_range() {
        let mut config = valid_config();
        config.classes[2].packet_count = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PacketCountOutOfRange { class: 2 })
        );
    }

    #[test]
    fn rejects_processing_threshold_out_of_range() {
        let mut config = valid_config();
        config.processing_threshold_ms = 20_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProcessingThresholdOutOfRange)
        );
    }

    #[test]
    fn rejects_tx_power_out_of_range() {
        let mut config = valid_config();
        config.link.tx_power = 200;
        assert_eq!(config.validate(), Err(ConfigError::TxPowerOutOfRange));
    }

    #[test]
    fn rejects_burst_interval_order_violation() {
        let mut config = valid_config();
        config.burst.burst_interval_ms = 10_000;
        assert_eq!(config.validate(), Err(ConfigError::BurstIntervalOrder));
    }
}
