//! Frequency calculations (register values -> frequencies)

use crate::{config::SynthesizerConfig, constants::*, errors::*};

impl SynthesizerConfig {
    /// Phase Frequency Detector' frequency, Hz
    /// f PFD = REF IN × [(1 + D)/(R × (1 + T))]
    /// where:
    /// REF IN is the reference frequency input.
    /// D is the RF REF IN doubler bit (0 or 1).
    /// R is the RF reference division factor (1 to 1023).
    /// T is the reference divide-by-2 bit (0 or 1).
    pub fn f_pfd_hz(&self, ref_in_hz: u32) -> Result<u64, Error> {
        if !(REF_IN_FREQ_MIN..REF_IN_FREQ_MAX).contains(&ref_in_hz) {
            return Err(Error::InvalidReferenceFrequency(ref_in_hz));
        }
        if self.r_count == 0 {
            return Err(Error::InvalidDivider("r_count"));
        }

        Ok(ref_in_hz as u64 * (1 + self.ref_doubler as u64)
            / (self.r_count as u64 * (1 + self.rdiv2 as u64)))
    }

    /// VCO frequency, Hz.
    /// N = INT + FRAC/MOD applies to the VCO with fundamental feedback
    /// and to the divided output otherwise.
    pub fn f_vco_hz(&self, ref_in_hz: u32) -> Result<u64, Error> {
        if self.modulus == 0 {
            return Err(Error::InvalidDivider("modulus"));
        }
        let fpfd = self.f_pfd_hz(ref_in_hz)?;
        let n = self.int_div as u64 * fpfd + self.frac as u64 * fpfd / self.modulus as u64;

        Ok(if self.feedback_select == 1 {
            n
        } else {
            n << self.rf_div
        })
    }

    /// Output frequency
    /// RF OUT = f VCO / RF Divider
    pub fn f_out_hz(&self, ref_in_hz: u32) -> Result<u64, Error> {
        Ok(self.f_vco_hz(ref_in_hz)? >> self.rf_div)
    }

    /// True if the VCO lands in its fundamental range
    pub fn vco_in_range(&self, ref_in_hz: u32) -> Result<bool, Error> {
        Ok((VCO_FREQ_MIN..=VCO_FREQ_MAX).contains(&self.f_vco_hz(ref_in_hz)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_at_25mhz() -> Result<(), Error> {
        let cfg = SynthesizerConfig::default();

        assert_eq!(25_000_000, cfg.f_pfd_hz(25_000_000)?);
        // (43 + 400/1000) * 25 MHz, divided feedback
        assert_eq!(1_085_000_000, cfg.f_out_hz(25_000_000)?);
        assert_eq!(8_680_000_000, cfg.f_vco_hz(25_000_000)?);
        assert!(!cfg.vco_in_range(25_000_000)?);
        Ok(())
    }

    #[test]
    fn fundamental_feedback_divides_output() -> Result<(), Error> {
        let cfg = SynthesizerConfig {
            int_div: 128,
            frac: 0,
            feedback_select: 1,
            rf_div: 2,
            ref_doubler: 1,
            rdiv2: 1,
            ..Default::default()
        };

        assert_eq!(3_200_000_000, cfg.f_vco_hz(25_000_000)?);
        assert_eq!(800_000_000, cfg.f_out_hz(25_000_000)?);
        assert!(cfg.vco_in_range(25_000_000)?);
        Ok(())
    }

    #[rstest::rstest]
    #[case(9_999_999)]
    #[case(250_000_000)]
    #[test]
    fn reference_out_of_range(#[case] ref_in_hz: u32) {
        assert!(matches!(
            SynthesizerConfig::default().f_pfd_hz(ref_in_hz),
            Err(Error::InvalidReferenceFrequency(f)) if f == ref_in_hz
        ));
    }

    #[test]
    fn zero_dividers() {
        let cfg = SynthesizerConfig {
            r_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.f_pfd_hz(25_000_000),
            Err(Error::InvalidDivider("r_count"))
        ));

        let cfg = SynthesizerConfig {
            modulus: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.f_out_hz(25_000_000),
            Err(Error::InvalidDivider("modulus"))
        ));
    }
}
