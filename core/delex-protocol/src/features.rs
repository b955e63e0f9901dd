use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use alloc::string::String;
use bitflags::bitflags;
use core::fmt;

macro_rules! feature_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr => $text:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// The form used inside rendered tags.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

feature_enum!(Aspect {
    Simple = 0 => "simple",
    Progressive = 1 => "progressive",
    Perfect = 2 => "perfect",
    PerfectProgressive = 3 => "perfect-progressive",
});

feature_enum!(Tense {
    Infinitive = 0 => "infinitive",
    Present = 1 => "present",
    Past = 2 => "past",
    Future = 3 => "future",
    PastPerfect = 4 => "past perfect",
});

feature_enum!(Voice {
    Active = 0 => "active",
    Passive = 1 => "passive",
});

feature_enum!(
    /// `Null` when the first tag of the group is not a present-tense finite tag.
    Person {
        Third = 0 => "3rd",
        NonThird = 1 => "non-3rd",
        Null = 2 => "null",
    }
);

feature_enum!(
    /// Only ever set for groups headed by a form of "be".
    Number {
        Singular = 0 => "singular",
        Plural = 1 => "plural",
        Null = 2 => "null",
    }
);

feature_enum!(DeterminerForm {
    Defined = 0 => "defined",
    Undefined = 1 => "undefined",
    Demonstrative = 2 => "demonstrative",
});

/// Features of one inflected verb group, plus the lemma of its lexical verb.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct GrammaticalFeatureTag {
    pub aspect: Aspect,
    pub tense: Tense,
    pub voice: Voice,
    pub person: Person,
    pub number: Number,
    pub lemma: String,
}

impl fmt::Display for GrammaticalFeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VP[aspect={},tense={},voice={},person={},number={}] {}",
            self.aspect, self.tense, self.voice, self.person, self.number, self.lemma
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DeterminerFeatureTag {
    pub form: DeterminerForm,
    pub lemma: String,
}

impl fmt::Display for DeterminerFeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DT[form={}] {}", self.form, self.lemma)
    }
}

bitflags! {
    /// Penn Treebank verbal tags, as a set so one slot can accept several tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct VerbTags: u8 {
        const VB = 1;
        const VBD = 2;
        const VBG = 4;
        const VBN = 8;
        const VBP = 16;
        const VBZ = 32;
        const MD = 64;

        // Base form or present finite
        const PRESENT = Self::VB.bits() | Self::VBP.bits() | Self::VBZ.bits();
        const PAST = Self::VBD.bits();
    }
}

impl VerbTags {
    /// Maps a POS tag onto its flag. Non-verbal tags map to the empty set.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "VB" => VerbTags::VB,
            "VBD" => VerbTags::VBD,
            "VBG" => VerbTags::VBG,
            "VBN" => VerbTags::VBN,
            "VBP" => VerbTags::VBP,
            "VBZ" => VerbTags::VBZ,
            "MD" => VerbTags::MD,
            _ => VerbTags::empty(),
        }
    }
}
