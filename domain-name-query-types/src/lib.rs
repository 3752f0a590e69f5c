use std::fmt;
use std::str::FromStr;

/// Record type carried in questions and resource records.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QType {
    A,
    Cname,
    Other(u16),
}

impl QType {
    pub fn new(value: u16) -> Self {
        match value {
            1 => QType::A,
            5 => QType::Cname,
            other => QType::Other(other),
        }
    }

    pub fn num(&self) -> u16 {
        match self {
            QType::A => 1,
            QType::Cname => 5,
            QType::Other(other) => *other,
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QType::A => write!(f, "A"),
            QType::Cname => write!(f, "CNAME"),
            QType::Other(n) => write!(f, "TYPE{}", n),
        }
    }
}

// Unknown mnemonics map to type 0. A query for type 0 matches those rows.
impl FromStr for QType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s {
            "A" => QType::A,
            "CNAME" => QType::Cname,
            _ => QType::Other(0),
        };
        Ok(t)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QClass {
    In,
    Other(u16),
}

impl QClass {
    pub fn new(value: u16) -> Self {
        match value {
            1 => QClass::In,
            other => QClass::Other(other),
        }
    }

    pub fn num(&self) -> u16 {
        match self {
            QClass::In => 1,
            QClass::Other(other) => *other,
        }
    }
}

impl fmt::Display for QClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QClass::In => write!(f, "IN"),
            QClass::Other(n) => write!(f, "CLASS{}", n),
        }
    }
}

impl FromStr for QClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = match s {
            "IN" => QClass::In,
            _ => QClass::Other(0),
        };
        Ok(c)
    }
}

pub type Name = String;

/// Lower-cases ASCII letters and strips one trailing dot. The root name "."
/// is returned unchanged.
pub fn canonicalize(name: &str) -> Name {
    if name == "." {
        return Name::from(name);
    }

    let trimmed = name.strip_suffix('.').unwrap_or(name);
    trimmed.to_ascii_lowercase()
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NameQuery {
    pub name: Name,
    pub q_type: QType,
}

impl NameQuery {
    pub fn new(name_str: &str, q_type: QType) -> Self {
        Self {
            name: canonicalize(name_str),
            q_type,
        }
    }

    pub fn a_record(name_str: &str) -> Self {
        Self::new(name_str, QType::A)
    }
}

impl fmt::Display for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.q_type)
    }
}
