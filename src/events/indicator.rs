use serde::{Deserialize, Serialize};
use std::fmt;

/// Слот индикатора (порядок совпадает с битами состояния)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    CapsLock = 0,
    NumLock = 1,
    ScrollLock = 2,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::CapsLock, Slot::NumLock, Slot::ScrollLock];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Базовое имя файла иконки: `<stem>-on.png` / `<stem>-off.png`
    pub fn icon_stem(self) -> &'static str {
        match self {
            Slot::CapsLock => "capslock",
            Slot::NumLock => "numlock",
            Slot::ScrollLock => "scrllock",
        }
    }

    fn mask(self) -> u32 {
        1 << self.index()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::CapsLock => "Caps Lock",
            Slot::NumLock => "Num Lock",
            Slot::ScrollLock => "Scroll Lock",
        };
        write!(f, "{}", name)
    }
}

/// Снимок трёх индикаторов. Биты старше второго отбрасываются при создании.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorState(u32);

impl IndicatorState {
    pub const MASK: u32 = 0b111;

    pub fn from_bits(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_on(self, slot: Slot) -> bool {
        self.0 & slot.mask() != 0
    }

    pub fn with(self, slot: Slot, on: bool) -> Self {
        if on {
            Self(self.0 | slot.mask())
        } else {
            Self(self.0 & !slot.mask())
        }
    }

    pub fn complement(self) -> Self {
        Self::from_bits(!self.0)
    }
}

impl From<u32> for IndicatorState {
    fn from(raw: u32) -> Self {
        Self::from_bits(raw)
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |slot| if self.is_on(slot) { "on" } else { "off" };
        write!(
            f,
            "caps={} num={} scroll={}",
            on_off(Slot::CapsLock),
            on_off(Slot::NumLock),
            on_off(Slot::ScrollLock)
        )
    }
}

/// Событие изменения: слот должен получить новую иконку
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorChange {
    pub slot: Slot,
    pub is_on: bool,
}

impl IndicatorChange {
    pub fn new(slot: Slot, is_on: bool) -> Self {
        Self { slot, is_on }
    }
}

impl fmt::Display for IndicatorChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.slot, if self.is_on { "вкл" } else { "выкл" })
    }
}
