//! Built-in signature rules, in priority order.
//!
//! Offsets inside programs are relative to the signature match unless a
//! `Seek` has moved the cursor. Several generation checks test single
//! bytes at fixed distances from the signature; those conditions are
//! empirical and are kept exactly as observed in shipped images.

use super::{utf16le, Rule};
use crate::decode::{Arm, Condition, Failure, Field, Render, Step};

const DOT: u16 = b'.' as u16;

// Intel GOP

const GOP_SIGNATURE: [u8; 38] = utf16le("Intel(R) GOP Driver");

const GOP_SANDY_BRIDGE_OFFSET: isize = 0x98;
const GOP_IVY_BRIDGE_OFFSET: isize = 0xA0;
const GOP_HASWELL_OFFSET: isize = 0xC0;
const GOP_BROADWELL_OFFSET: isize = 0xF4;

// Relative to the major digit.
const GOP_MINOR_AT: isize = 4;
const GOP_BUILD_AT: isize = 8;
const GOP_BUILD_AFTER_REVISION_AT: isize = 16;
const GOP_MINOR_UNITS: usize = 2;
const GOP_BUILD_UNITS: usize = 5;

const GOP_MINOR: Step<'static> =
    Step::Field(Field::utf16(GOP_MINOR_AT, GOP_MINOR_UNITS, Some(DOT)));
const GOP_BUILD: Step<'static> = Step::Field(Field::utf16(GOP_BUILD_AT, GOP_BUILD_UNITS, None));

/// Sandy Bridge and Ivy Bridge builds may carry a revision between minor
/// and build, flagged by a dot right after the major digit.
const GOP_MINOR_AND_BUILD: Step<'static> = Step::Select {
    arms: &[Arm {
        when: Condition::ByteIs { at: 2, value: b'.' },
        then: &[
            GOP_MINOR,
            Step::Field(Field::utf16(
                GOP_BUILD_AFTER_REVISION_AT,
                GOP_BUILD_UNITS,
                None,
            )),
        ],
    }],
    otherwise: &[GOP_MINOR, GOP_BUILD],
};

const INTEL_GOP: Rule<'static> = Rule {
    name: "Intel GOP",
    signature: &GOP_SIGNATURE,
    program: &[Step::Select {
        arms: &[
            Arm {
                when: Condition::ByteIs {
                    at: GOP_SANDY_BRIDGE_OFFSET,
                    value: b'2',
                },
                then: &[
                    Step::Seek(GOP_SANDY_BRIDGE_OFFSET),
                    GOP_MINOR_AND_BUILD,
                    Step::Emit {
                        label: "EFI GOP Driver SandyBridge",
                        template: "2.{}.{}",
                    },
                ],
            },
            Arm {
                when: Condition::ByteIs {
                    at: GOP_IVY_BRIDGE_OFFSET,
                    value: b'3',
                },
                then: &[
                    Step::Seek(GOP_IVY_BRIDGE_OFFSET),
                    GOP_MINOR_AND_BUILD,
                    Step::Emit {
                        label: "EFI GOP Driver IvyBridge",
                        template: "3.{}.{}",
                    },
                ],
            },
            Arm {
                when: Condition::ByteIs {
                    at: GOP_HASWELL_OFFSET,
                    value: b'5',
                },
                then: &[
                    Step::Seek(GOP_HASWELL_OFFSET),
                    GOP_MINOR,
                    GOP_BUILD,
                    Step::Emit {
                        label: "EFI GOP Driver Haswell",
                        template: "5.{}.{}",
                    },
                ],
            },
            Arm {
                when: Condition::ByteIs {
                    at: GOP_BROADWELL_OFFSET,
                    value: b'5',
                },
                then: &[
                    Step::Seek(GOP_BROADWELL_OFFSET),
                    // Broadwell drops the minor field; the build follows the major.
                    Step::Field(Field::utf16(GOP_MINOR_AT, GOP_BUILD_UNITS, None)),
                    Step::Emit {
                        label: "EFI GOP Driver Broadwell",
                        template: "5.{}",
                    },
                ],
            },
        ],
        otherwise: &[Step::Fail(Failure::Unrecognized)],
    }],
};

// ASPEED GOP

const ASPEED_GOP_SIGNATURE: [u8; 16] = [
    0x0F, 0x10, 0x0B, 0x0D, 0x10, 0x0B, 0x0C, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
/// PCI data structure header; present when the driver sits in an option ROM.
const PCI_DATA_MARKER: &[u8] = b"\x00PCIR";

/// Version bytes are build, minor, major at +56, +57, +58.
const ASPEED_BUILD_AT: isize = 56;
const ASPEED_MINOR_AT: isize = 57;
const ASPEED_MAJOR_AT: isize = 58;

/// Some builds store a code in the minor byte instead of the version;
/// the code stands for the full (build, minor, major) triple.
const fn aspeed_code(code: u8, then: &'static [Step<'static>]) -> Arm<'static> {
    Arm {
        when: Condition::ByteIs {
            at: ASPEED_MINOR_AT,
            value: code,
        },
        then,
    }
}

const ASPEED_GOP: Rule<'static> = Rule {
    name: "ASPEED GOP",
    signature: &ASPEED_GOP_SIGNATURE,
    program: &[
        Step::Select {
            arms: &[
                aspeed_code(
                    37,
                    &[Step::Patch {
                        at: ASPEED_BUILD_AT,
                        bytes: &[0x08, 0x93, 0x00],
                    }],
                ),
                aspeed_code(
                    33,
                    &[Step::Patch {
                        at: ASPEED_BUILD_AT,
                        bytes: &[0x00, 0x96, 0x00],
                    }],
                ),
                aspeed_code(
                    144,
                    &[Step::Patch {
                        at: ASPEED_BUILD_AT,
                        bytes: &[0x06, 0x97, 0x00],
                    }],
                ),
            ],
            otherwise: &[],
        },
        Step::Field(Field::byte(ASPEED_MAJOR_AT, Render::hex(0))),
        Step::Field(Field::byte(ASPEED_MINOR_AT, Render::hex(2))),
        Step::Field(Field::byte(ASPEED_BUILD_AT, Render::hex(2))),
        Step::Select {
            arms: &[Arm {
                when: Condition::Contains(PCI_DATA_MARKER),
                then: &[Step::Emit {
                    label: "EFI GOP-in-OROM ASPEED",
                    template: "{}.{}.{}",
                }],
            }],
            otherwise: &[Step::Emit {
                label: "EFI GOP ASPEED",
                template: "{}.{}.{}",
            }],
        },
    ],
};

// Intel RST / RSTe

const RST_SIGNATURE: [u8; 28] = utf16le("Intel(R) RST 1");
const RSTE_SIGNATURE: [u8; 22] = utf16le("Intel RSTe ");
const RST_VERSION_UNITS: usize = 11;

const INTEL_RST: Rule<'static> = Rule {
    name: "Intel RST",
    signature: &RST_SIGNATURE,
    program: &[
        // The version starts at the trailing "1" of the signature.
        Step::Field(Field::utf16(0x1A, RST_VERSION_UNITS, None)),
        Step::Emit {
            label: "EFI IRST SATA",
            template: "{}",
        },
    ],
};

const INTEL_RSTE: Rule<'static> = Rule {
    name: "Intel RSTe",
    signature: &RSTE_SIGNATURE,
    program: &[
        Step::Field(Field::utf16(0x16, RST_VERSION_UNITS, None)),
        Step::Emit {
            label: "EFI IRSTe SATA",
            template: "{}",
        },
    ],
};

// Marvell SATA

const MARVELL_SIGNATURE: [u8; 30] = utf16le("Marvell Channel");
const MARVELL_RAID_MARKER: &[u8] = b"MARVELL Raid";

const MARVELL_SATA: Rule<'static> = Rule {
    name: "Marvell SATA",
    signature: &MARVELL_SIGNATURE,
    program: &[
        Step::Field(Field::high_nibble(59, Render::hex(0))),
        Step::Field(Field::low_nibble(59, Render::hex(0))),
        Step::Field(Field::byte(58, Render::hex(0))),
        Step::Field(Field::u16_le(56, Render::hex(4))),
        Step::Select {
            arms: &[Arm {
                when: Condition::Contains(MARVELL_RAID_MARKER),
                then: &[Step::Emit {
                    label: "EFI Marvell SATA RAID",
                    template: "{}.{}.{}.{}",
                }],
            }],
            otherwise: &[Step::Emit {
                label: "EFI Marvell SATA AHCI",
                template: "{}.{}.{}.{}",
            }],
        },
    ],
};

// Network UNDI drivers. The cursor lands on the major byte; minor and
// build sit just below it.

const INTEL_UNDI_SIGNATURE: &[u8] = &[0x20, 0x0C, 0x9A, 0x66];

const INTEL_UNDI: Rule<'static> = Rule {
    name: "Intel UNDI",
    signature: INTEL_UNDI_SIGNATURE,
    program: &[
        Step::Select {
            arms: &[
                Arm {
                    when: Condition::ByteIs { at: 0x2F, value: 4 },
                    then: &[Step::Seek(0x2F)],
                },
                Arm {
                    when: Condition::ByteIn {
                        at: 0x1F,
                        values: &[5, 6],
                    },
                    then: &[Step::Seek(0x1F)],
                },
            ],
            otherwise: &[Step::Fail(Failure::Unsupported {
                notice: "Unknown Intel LAN version.",
            })],
        },
        Step::Field(Field::byte(0, Render::hex(0))),
        Step::Field(Field::byte(-1, Render::hex(0))),
        Step::Field(Field::byte(-2, Render::hex(2))),
        Step::Emit {
            label: "EFI Intel UNDI",
            template: "{}.{}.{}",
        },
    ],
};

const BROADCOM_UNDI: Rule<'static> = Rule {
    name: "Broadcom UNDI",
    signature: b"UNDI_VER",
    program: &[
        Step::Select {
            arms: &[
                Arm {
                    when: Condition::ByteIs {
                        at: 0x11A,
                        value: 14,
                    },
                    then: &[Step::Seek(0x11A)],
                },
                Arm {
                    when: Condition::ByteIs {
                        at: 0x12A,
                        value: 15,
                    },
                    then: &[Step::Seek(0x12A)],
                },
                Arm {
                    when: Condition::ByteIs {
                        at: 0x16A,
                        value: 16,
                    },
                    then: &[Step::Seek(0x16A)],
                },
            ],
            otherwise: &[Step::Fail(Failure::Unsupported {
                notice: "Unknown Broadcom LAN version.",
            })],
        },
        Step::Field(Field::byte(0, Render::decimal())),
        Step::Field(Field::byte(-1, Render::decimal())),
        Step::Field(Field::byte(-2, Render::decimal())),
        Step::Emit {
            label: "EFI Broadcom UNDI",
            template: "{}.{}.{}",
        },
    ],
};

// Realtek keeps the version below the signature. A non-zero byte above
// the cursor means the layout with a separate build suffix.

const REALTEK_UNKNOWN: Step<'static> = Step::Fail(Failure::Unsupported {
    notice: "Unknown Realtek LAN version.",
});

const REALTEK_VERSION: Step<'static> = Step::Select {
    arms: &[Arm {
        when: Condition::ByteNot { at: 1, value: 0 },
        then: &[
            Step::Field(Field::high_nibble(1, Render::hex(0))),
            Step::Field(Field::byte(0, Render::hex(3))),
            Step::Field(Field::byte(-1, Render::upper_hex(0))),
            Step::Emit {
                label: "EFI Realtek UNDI",
                template: "{}.{} {}",
            },
        ],
    }],
    otherwise: &[
        Step::Field(Field::high_nibble(0, Render::hex(0))),
        Step::Field(Field::byte(-1, Render::upper_hex(3))),
        Step::Emit {
            label: "EFI Realtek UNDI",
            template: "{}.{}",
        },
    ],
};

const REALTEK_UNDI: Rule<'static> = Rule {
    name: "Realtek UNDI",
    signature: &[0x01, 0xB2, 0x38, 0x78, 0x81, 0x43, 0x9B, 0x43],
    program: &[
        Step::Select {
            arms: &[Arm {
                when: Condition::ByteIn {
                    at: 0x17,
                    values: &[4, 0],
                },
                then: &[Step::Seek(-0x17)],
            }],
            otherwise: &[REALTEK_UNKNOWN],
        },
        REALTEK_VERSION,
    ],
};

const REALTEK_UNDI_LEGACY: Rule<'static> = Rule {
    name: "Realtek UNDI (legacy)",
    signature: &[0x04, 0x34, 0x00, 0x00, 0x00, 0x34, 0x00, 0x00, 0x00],
    program: &[
        Step::Select {
            arms: &[Arm {
                when: Condition::ByteIs { at: 0x1E, value: 0 },
                then: &[Step::Seek(-0x1E)],
            }],
            otherwise: &[REALTEK_UNKNOWN],
        },
        REALTEK_VERSION,
    ],
};

/// All built-in rules; earlier entries win.
pub static RULES: &[Rule<'static>] = &[
    INTEL_GOP,
    ASPEED_GOP,
    INTEL_RST,
    INTEL_RSTE,
    MARVELL_SATA,
    INTEL_UNDI,
    BROADCOM_UNDI,
    REALTEK_UNDI,
    REALTEK_UNDI_LEGACY,
];
