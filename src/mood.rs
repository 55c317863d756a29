use crate::model::Vitals;
use std::fmt;

/// Five ordered tiers derived from the average of the four vitals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mood {
    Unhappy,
    Sad,
    Content,
    Happy,
    Ecstatic,
}

impl Mood {
    pub fn classify(v: &Vitals) -> Self {
        Self::from_average(v.average())
    }

    pub fn from_average(avg: i32) -> Self {
        match avg {
            a if a > 80 => Mood::Ecstatic,
            a if a > 60 => Mood::Happy,
            a if a > 40 => Mood::Content,
            a if a > 20 => Mood::Sad,
            _ => Mood::Unhappy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Ecstatic => "Ecstatic",
            Mood::Happy => "Happy",
            Mood::Content => "Content",
            Mood::Sad => "Sad",
            Mood::Unhappy => "Unhappy",
        }
    }

    pub fn face(self) -> &'static str {
        match self {
            Mood::Ecstatic => "(^o^)",
            Mood::Happy => "(^_^)",
            Mood::Content => "(-_-)",
            Mood::Sad => "(._.)",
            Mood::Unhappy => "(T_T)",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
