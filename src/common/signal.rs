use std::ops::Not;

// 핀의 상태
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Signal {
    Zero,
    One,
    #[default]
    Unknown,
}

impl Signal {
    pub fn is_one(&self) -> bool {
        matches!(self, Signal::One)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Signal::Zero)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Signal::Unknown)
    }

    pub fn and(self, other: Signal) -> Signal {
        match (self, other) {
            (Signal::Unknown, _) | (_, Signal::Unknown) => Signal::Unknown,
            (Signal::One, Signal::One) => Signal::One,
            _ => Signal::Zero,
        }
    }

    pub fn or(self, other: Signal) -> Signal {
        match (self, other) {
            (Signal::Unknown, _) | (_, Signal::Unknown) => Signal::Unknown,
            (Signal::One, _) | (_, Signal::One) => Signal::One,
            _ => Signal::Zero,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Signal::Zero => "0",
            Signal::One => "1",
            Signal::Unknown => "?",
        }
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        match self {
            Signal::Zero => Signal::One,
            Signal::One => Signal::Zero,
            Signal::Unknown => Signal::Unknown,
        }
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value {
            Signal::One
        } else {
            Signal::Zero
        }
    }
}
