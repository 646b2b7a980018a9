//! ADF4351 registers

use core::marker::PhantomData;

use crate::constants::*;

/// Register number marker types
macro_rules! gen_register_marker {
    ($r:ident) => {
        /// Register marker
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $r {}
    };
}

gen_register_marker!(R0);
gen_register_marker!(R1);
gen_register_marker!(R2);
gen_register_marker!(R3);
gen_register_marker!(R4);
gen_register_marker!(R5);

/// Single config register.
/// Control bits [2:0] are left at zero, the address is added on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reg<R> {
    /// Config register word
    pub w: u32,
    phantom: PhantomData<R>,
}

impl<R> Default for Reg<R> {
    #[inline]
    fn default() -> Self {
        Reg {
            w: 0,
            phantom: PhantomData,
        }
    }
}

/// Bit operations on 32bit words
impl<R> Reg<R> {
    #[inline]
    pub fn get<F>(&self) -> F
    where
        F: BitField<R> + From<u32>,
    {
        F::from((self.w >> F::offset()) & F::mask())
    }

    /// Replaces one field. Out of range values are masked, callers validate first.
    #[inline]
    pub fn set<F>(mut self, f: F) -> Self
    where
        F: BitField<R> + Into<u32>,
    {
        let fbits = (f.into() & F::mask()) << F::offset();
        let rbits = self.w & !(F::mask() << F::offset());
        self.w = rbits | fbits;
        self
    }
}

/// Full set of config registers, the image sent to the chip.
/// Defaults to all config bits set to 0.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RegisterSet {
    pub r0: Reg<R0>,
    pub r1: Reg<R1>,
    pub r2: Reg<R2>,
    pub r3: Reg<R3>,
    pub r4: Reg<R4>,
    pub r5: Reg<R5>,
}

/// Type-indexed register access
pub trait RIdx<R> {
    fn r(&self) -> Reg<R>;
    fn update_r<F>(self, f: F) -> Self
    where
        F: FnOnce(Reg<R>) -> Reg<R>;
}

macro_rules! gen_register_index {
    ($r:ident, $f:tt) => {
        impl RIdx<$r> for RegisterSet {
            #[inline]
            fn r(&self) -> Reg<$r> {
                self.$f
            }

            #[inline]
            fn update_r<F>(mut self, f: F) -> Self
            where
                F: FnOnce(Reg<$r>) -> Reg<$r>,
            {
                self.$f = f(self.$f);
                self
            }
        }
    };
}

gen_register_index!(R0, r0);
gen_register_index!(R1, r1);
gen_register_index!(R2, r2);
gen_register_index!(R3, r3);
gen_register_index!(R4, r4);
gen_register_index!(R5, r5);

impl RegisterSet {
    /// Register values in device format, indexed by register address.
    #[inline]
    pub fn to_words(&self) -> [u32; REGISTER_COUNT] {
        [
            self.r0.w, self.r1.w, self.r2.w, self.r3.w, self.r4.w, self.r5.w,
        ]
    }

    /// Get register bitfield value
    #[inline]
    pub fn get<F, R>(&self) -> F
    where
        F: BitField<R> + From<u32>,
        Self: RIdx<R>,
    {
        RIdx::<R>::r(self).get()
    }

    /// Update register bitfield
    #[inline]
    pub fn set<F, R>(self, f: F) -> Self
    where
        F: BitField<R> + Into<u32>,
        Self: RIdx<R>,
    {
        self.update_r(|r| r.set(f))
    }
}

/// Bit operations on 32bit words
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFF_FFFFu32 << Self::num_bits())
    }

    /// True if `v` can be stored without truncation
    #[inline]
    fn fits(v: u32) -> bool {
        v & !Self::mask() == 0
    }
}

/// Bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield {
    ($(#[$meta:meta])* $r:ty, $n:ident, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $n(pub u32);

        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }

        impl From<u32> for $n { #[inline] fn from(x: u32) -> Self { $n(x) } }
        impl From<$n> for u32 { #[inline] fn from(f: $n) -> u32 { f.0 } }
    };
}

gen_bitfield!(
    /// INT, Bits[DB30:DB15]. Integer part of the feedback division factor,
    /// 23..65535 with the 4/5 prescaler, 75..65535 with 8/9.
    R0, Int, 16, 15
);

gen_bitfield!(
    /// FRAC, Bits[DB14:DB3]. Numerator of the fraction fed to the
    /// sigma-delta modulator, 0..(MOD - 1).
    R0, Frac, 12, 3
);

gen_bitfield!(
    /// Phase adjust, Bit DB28. When set the part skips VCO band selection
    /// and phase resync on R0 updates.
    R1, PhaseAdjust, 1, 28
);

gen_bitfield!(
    /// Prescaler, Bit DB27. 0 = 4/5 (RF up to 3.6 GHz), 1 = 8/9.
    R1, Prescaler, 1, 27
);

gen_bitfield!(
    /// Phase word, Bits[DB26:DB15]. Must be less than MOD.
    R1, Phase, 12, 15
);

gen_bitfield!(
    /// Fractional modulus, Bits[DB14:DB3].
    R1, Mod, 12, 3
);

gen_bitfield!(
    /// Noise mode, Bits[DB30:DB29]. 0b00 low noise, 0b11 low spur.
    R2, NoiseMode, 2, 29
);

gen_bitfield!(
    /// MUXOUT select, Bits[DB28:DB26].
    R2, Muxout, 3, 26
);

gen_bitfield!(R2, RefDoubler, 1, 25);

gen_bitfield!(
    /// REFin divide-by-2 between the R counter and the PFD, Bit DB24.
    R2, Rdiv2, 1, 24
);

gen_bitfield!(
    /// R counter, Bits[DB23:DB14]. Division ratios 1..1023.
    R2, RCounter, 10, 14
);

gen_bitfield!(
    /// Double buffering of R4 Bits[DB22:DB20], Bit DB13.
    R2, DoubleBuffer, 1, 13
);

gen_bitfield!(
    /// Charge pump current, Bits[DB12:DB9]. 0 = minimum, 15 = maximum.
    R2, ChargePumpCurrent, 4, 9
);

gen_bitfield!(
    /// Lock detect function, Bit DB8. 0 for FRAC-N (40 PFD cycles),
    /// 1 for INT-N (5 PFD cycles).
    R2, Ldf, 1, 8
);

gen_bitfield!(
    /// Lock detect precision, Bit DB7. 0 = 10 ns window, 1 = 6 ns.
    R2, Ldp, 1, 7
);

gen_bitfield!(
    /// Phase detector polarity, Bit DB6. 1 for passive or non-inverting
    /// active loop filters.
    R2, PhaseDetectorPolarity, 1, 6
);

gen_bitfield!(R2, PowerDown, 1, 5);

gen_bitfield!(R2, ChargePumpThreeState, 1, 4);

gen_bitfield!(R2, CounterReset, 1, 3);

gen_bitfield!(
    /// Band select clock mode, Bit DB23. 1 selects the fast band select
    /// logic, the band select clock divider must then be <= 254.
    R3, BandSelectClockMode, 1, 23
);

gen_bitfield!(
    /// Antibacklash pulse width, Bit DB22. 0 = 6 ns (FRAC-N), 1 = 3 ns (INT-N).
    R3, AntiBacklashPulseWidth, 1, 22
);

gen_bitfield!(
    /// Charge cancellation, Bit DB21. 0 for FRAC-N.
    R3, ChargeCancellation, 1, 21
);

gen_bitfield!(
    /// Cycle slip reduction, Bit DB18. Needs a 50% duty cycle at the PFD
    /// and minimum charge pump current.
    R3, CycleSlipReduction, 1, 18
);

gen_bitfield!(
    /// Clock divider mode, Bits[DB16:DB15]. 0b00 off, 0b01 fast lock,
    /// 0b10 phase resync.
    R3, ClockDividerMode, 2, 15
);

gen_bitfield!(
    /// Clock divider value, Bits[DB14:DB3].
    R3, ClockDividerValue, 12, 3
);

gen_bitfield!(
    /// Feedback select, Bit DB23. 0 from the output dividers, 1 from the VCO.
    R4, FeedbackSelect, 1, 23
);

gen_bitfield!(
    /// RF divider select, Bits[DB22:DB20]. Output divider is 2^value.
    R4, RfDividerSelect, 3, 20
);

gen_bitfield!(
    /// Band select clock divider, Bits[DB19:DB12].
    R4, BandSelectClockDiv, 8, 12
);

gen_bitfield!(R4, VcoPowerDown, 1, 11);

gen_bitfield!(
    /// Mute till lock detect, Bit DB10.
    R4, MuteTillLockDetect, 1, 10
);

gen_bitfield!(
    /// AUX output select, Bit DB9. 0 divided output, 1 fundamental.
    R4, AuxOutputSelect, 1, 9
);

gen_bitfield!(R4, AuxOutputEnable, 1, 8);

gen_bitfield!(R4, AuxOutputPower, 2, 6);

gen_bitfield!(R4, RfOutputEnable, 1, 5);

gen_bitfield!(
    /// Output power, Bits[DB4:DB3]. 3 = maximum.
    R4, OutputPower, 2, 3
);

gen_bitfield!(
    /// Lock detect pin mode, Bits[DB23:DB22]. 0b01 = digital lock detect.
    R5, LockDetectPin, 2, 22
);
