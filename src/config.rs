//! Synthesizer configuration, register image composition

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{errors::*, register::*};

/// Human-level synthesizer settings, one integer per register bitfield.
///
/// Every field must fit the width of its bitfield, see [`SynthesizerConfig::validate`].
/// Defaults to the reference bring-up configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesizerConfig {
    // R0
    pub int_div: u32,
    pub frac: u32,

    // R1
    /// 1 disables VCO band selection on R0 updates
    pub phase_adjust: u32,
    pub prescaler: u32,
    pub phase: u32,
    pub modulus: u32,

    // R2
    pub noise_mode: u32,
    pub muxout: u32,
    pub ref_doubler: u32,
    pub rdiv2: u32,
    pub r_count: u32,
    pub double_buffer: u32,
    /// 0 = minimum, 15 = maximum
    pub cp_current: u32,
    /// lock detect: 0 for frac-N, 1 for int-N
    pub ldf: u32,
    pub ldp: u32,
    pub pd_polarity: u32,
    pub power_down: u32,
    pub cp_three_state: u32,
    pub counter_reset: u32,

    // R3
    pub band_select_clock_mode: u32,
    /// 0 for frac-N, 1 improves integer-N
    pub abp: u32,
    /// 0 for frac-N, 1 for int-N
    pub charge_cancel: u32,
    /// 1 improves lock time, needs minimum charge pump current
    pub csr: u32,
    pub clock_div_mode: u32,
    pub clock_divider: u32,

    // R4
    /// 0 from divider, 1 from VCO
    pub feedback_select: u32,
    /// RF divider is 2^rf_div
    pub rf_div: u32,
    pub band_select_clock_div: u32,
    pub vco_power_down: u32,
    pub mtld: u32,
    pub aux_out_select: u32,
    pub aux_out_enable: u32,
    pub aux_out_power: u32,
    pub rfout_en: u32,
    /// 3 = maximum
    pub out_power: u32,

    // R5
    /// 1 = digital lock detect
    pub ld_pin_mode: u32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        SynthesizerConfig {
            int_div: 43,
            frac: 400,

            phase_adjust: 0,
            prescaler: 0,
            phase: 0,
            modulus: 1000,

            noise_mode: 0,
            muxout: 0,
            ref_doubler: 0,
            rdiv2: 0,
            r_count: 1,
            double_buffer: 0,
            cp_current: 15,
            ldf: 0,
            ldp: 0,
            pd_polarity: 1,
            power_down: 0,
            cp_three_state: 0,
            counter_reset: 0,

            band_select_clock_mode: 0,
            abp: 0,
            charge_cancel: 0,
            csr: 0,
            clock_div_mode: 1,
            clock_divider: 0,

            feedback_select: 0,
            rf_div: 3,
            band_select_clock_div: 10,
            vco_power_down: 0,
            mtld: 0,
            aux_out_select: 0,
            aux_out_enable: 0,
            aux_out_power: 0,
            rfout_en: 1,
            out_power: 3,

            ld_pin_mode: 1,
        }
    }
}

/// Rejects a value wider than its bitfield
fn check<F, R>(field: &'static str, value: u32) -> Result<(), Error>
where
    F: BitField<R>,
{
    if F::fits(value) {
        Ok(())
    } else {
        Err(Error::ConfigOutOfRange {
            field,
            value,
            max_bits: F::num_bits(),
        })
    }
}

/// Binds config fields to register bitfields, generates validation and composition
macro_rules! gen_config_fields {
    ($($field:ident => $bf:ident),* $(,)?) => {
        impl SynthesizerConfig {
            /// Checks that every field fits its register bitfield.
            /// Fails on the first field that does not.
            pub fn validate(&self) -> Result<(), Error> {
                $( check::<$bf, _>(stringify!($field), self.$field)?; )*
                Ok(())
            }

            fn compose(&self) -> RegisterSet {
                RegisterSet::default()
                    $( .set($bf(self.$field)) )*
            }
        }
    };
}

gen_config_fields!(
    int_div => Int,
    frac => Frac,

    phase_adjust => PhaseAdjust,
    prescaler => Prescaler,
    phase => Phase,
    modulus => Mod,

    noise_mode => NoiseMode,
    muxout => Muxout,
    ref_doubler => RefDoubler,
    rdiv2 => Rdiv2,
    r_count => RCounter,
    double_buffer => DoubleBuffer,
    cp_current => ChargePumpCurrent,
    ldf => Ldf,
    ldp => Ldp,
    pd_polarity => PhaseDetectorPolarity,
    power_down => PowerDown,
    cp_three_state => ChargePumpThreeState,
    counter_reset => CounterReset,

    band_select_clock_mode => BandSelectClockMode,
    abp => AntiBacklashPulseWidth,
    charge_cancel => ChargeCancellation,
    csr => CycleSlipReduction,
    clock_div_mode => ClockDividerMode,
    clock_divider => ClockDividerValue,

    feedback_select => FeedbackSelect,
    rf_div => RfDividerSelect,
    band_select_clock_div => BandSelectClockDiv,
    vco_power_down => VcoPowerDown,
    mtld => MuteTillLockDetect,
    aux_out_select => AuxOutputSelect,
    aux_out_enable => AuxOutputEnable,
    aux_out_power => AuxOutputPower,
    rfout_en => RfOutputEnable,
    out_power => OutputPower,

    ld_pin_mode => LockDetectPin,
);

impl SynthesizerConfig {
    /// Register image for this configuration.
    /// Control bits [2:0] of every word are zero.
    pub fn encode(&self) -> Result<RegisterSet, Error> {
        self.validate()?;
        Ok(self.compose())
    }

    /// Copy with a different phase adjust bit
    pub fn with_phase_adjust(mut self, phase_adjust: u32) -> Self {
        self.phase_adjust = phase_adjust;
        self
    }

    /// Parses a JSON document, missing fields take reference values.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let config: SynthesizerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies a JSON object of field overrides on top of this configuration.
    pub fn merge_json(&self, s: &str) -> Result<Self, Error> {
        let overrides = match serde_json::from_str::<serde_json::Value>(s)? {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(Error::Json(serde::de::Error::custom(
                    "expected a JSON object",
                )))
            }
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut merged {
            map.extend(overrides);
        }

        let config: SynthesizerConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
