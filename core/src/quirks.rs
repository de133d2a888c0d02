/// # Quirks
/// Historic interpreters disagree on a handful of instructions and real programs depend on one
/// reading or another. The policy is chosen once, when the machine is built, and never mixed.
///
/// | flag                      | `false`                       | `true`                        |
/// |---------------------------|-------------------------------|-------------------------------|
/// | `load_store_increments_i` | Fx55/Fx65 leave I alone       | I += x + 1 afterwards         |
/// | `shift_reads_vy`          | 8xy6/8xyE shift Vx in place   | Vx = Vy shifted               |
/// | `jump_offset_uses_vx`     | Bnnn jumps to nnn + V0        | Bxnn jumps to xnn + Vx        |
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    pub load_store_increments_i: bool,
    pub shift_reads_vy: bool,
    pub jump_offset_uses_vx: bool,
}

impl Quirks {
    /// The original COSMAC VIP interpreter
    pub fn cosmac_vip() -> Self {
        Quirks {
            load_store_increments_i: true,
            shift_reads_vy: true,
            jump_offset_uses_vx: false,
        }
    }

    /// CHIP-48 on the HP-48 calculators, and most interpreters written since
    pub fn chip48() -> Self {
        Quirks {
            load_store_increments_i: false,
            shift_reads_vy: false,
            jump_offset_uses_vx: true,
        }
    }
}

/// Increments I on load/store, shifts Vx in place and offsets jumps by V0.
impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            load_store_increments_i: true,
            shift_reads_vy: false,
            jump_offset_uses_vx: false,
        }
    }
}
