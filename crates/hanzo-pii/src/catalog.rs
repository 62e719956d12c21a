//! Recognizer catalog
//!
//! The closed set of recognizer identifiers, the presets that group them and
//! the factory that turns an identifier into a working [`Recognizer`].

use crate::config::EngineConfig;
use crate::error::{PiiError, Result};
use crate::recognizers::{
    apac, contact, datetime, europe, financial, india, ner::NerRecognizer, uk, us,
    PatternRecognizer, Recognizer,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical recognizer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecognizerId {
    // United States
    UsSsn,
    UsPassport,
    UsDriverLicense,
    UsItin,
    UsBankAccount,
    UsAbaRouting,
    MedicalLicense,
    // United Kingdom
    UkNhs,
    UkNino,
    // India
    InPan,
    InAadhaar,
    InVehicleRegistration,
    InPassport,
    InVoterId,
    // Singapore
    SgFin,
    SgUen,
    // Australia
    AuAbn,
    AuAcn,
    AuTfn,
    AuMedicare,
    // Europe and Korea
    EsNif,
    EsNie,
    ItDriverLicense,
    ItFiscalCode,
    ItIdentityCard,
    ItPassport,
    ItVatCode,
    PlPesel,
    KrRrn,
    FiPersonalIdentityCode,
    // Financial
    CreditCard,
    Iban,
    Crypto,
    // Contact and technology
    Email,
    Phone,
    IpAddress,
    Url,
    // Date and time
    DateTime,
    // Model-backed NER
    Spacy,
    Transformers,
    Stanza,
    Gliner,
    // Remote services
    AzureAiLanguage,
    AzureHealthDeid,
}

impl RecognizerId {
    /// Every identifier in catalog order
    pub const ALL: &'static [RecognizerId] = &[
        RecognizerId::UsSsn,
        RecognizerId::UsPassport,
        RecognizerId::UsDriverLicense,
        RecognizerId::UsItin,
        RecognizerId::UsBankAccount,
        RecognizerId::UsAbaRouting,
        RecognizerId::MedicalLicense,
        RecognizerId::UkNhs,
        RecognizerId::UkNino,
        RecognizerId::InPan,
        RecognizerId::InAadhaar,
        RecognizerId::InVehicleRegistration,
        RecognizerId::InPassport,
        RecognizerId::InVoterId,
        RecognizerId::SgFin,
        RecognizerId::SgUen,
        RecognizerId::AuAbn,
        RecognizerId::AuAcn,
        RecognizerId::AuTfn,
        RecognizerId::AuMedicare,
        RecognizerId::EsNif,
        RecognizerId::EsNie,
        RecognizerId::ItDriverLicense,
        RecognizerId::ItFiscalCode,
        RecognizerId::ItIdentityCard,
        RecognizerId::ItPassport,
        RecognizerId::ItVatCode,
        RecognizerId::PlPesel,
        RecognizerId::KrRrn,
        RecognizerId::FiPersonalIdentityCode,
        RecognizerId::CreditCard,
        RecognizerId::Iban,
        RecognizerId::Crypto,
        RecognizerId::Email,
        RecognizerId::Phone,
        RecognizerId::IpAddress,
        RecognizerId::Url,
        RecognizerId::DateTime,
        RecognizerId::Spacy,
        RecognizerId::Transformers,
        RecognizerId::Stanza,
        RecognizerId::Gliner,
        RecognizerId::AzureAiLanguage,
        RecognizerId::AzureHealthDeid,
    ];

    /// Stable upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognizerId::UsSsn => "US_SSN",
            RecognizerId::UsPassport => "US_PASSPORT",
            RecognizerId::UsDriverLicense => "US_DRIVER_LICENSE",
            RecognizerId::UsItin => "US_ITIN",
            RecognizerId::UsBankAccount => "US_BANK_ACCOUNT",
            RecognizerId::UsAbaRouting => "US_ABA_ROUTING",
            RecognizerId::MedicalLicense => "MEDICAL_LICENSE",
            RecognizerId::UkNhs => "UK_NHS",
            RecognizerId::UkNino => "UK_NINO",
            RecognizerId::InPan => "IN_PAN",
            RecognizerId::InAadhaar => "IN_AADHAAR",
            RecognizerId::InVehicleRegistration => "IN_VEHICLE_REGISTRATION",
            RecognizerId::InPassport => "IN_PASSPORT",
            RecognizerId::InVoterId => "IN_VOTER_ID",
            RecognizerId::SgFin => "SG_FIN",
            RecognizerId::SgUen => "SG_UEN",
            RecognizerId::AuAbn => "AU_ABN",
            RecognizerId::AuAcn => "AU_ACN",
            RecognizerId::AuTfn => "AU_TFN",
            RecognizerId::AuMedicare => "AU_MEDICARE",
            RecognizerId::EsNif => "ES_NIF",
            RecognizerId::EsNie => "ES_NIE",
            RecognizerId::ItDriverLicense => "IT_DRIVER_LICENSE",
            RecognizerId::ItFiscalCode => "IT_FISCAL_CODE",
            RecognizerId::ItIdentityCard => "IT_IDENTITY_CARD",
            RecognizerId::ItPassport => "IT_PASSPORT",
            RecognizerId::ItVatCode => "IT_VAT_CODE",
            RecognizerId::PlPesel => "PL_PESEL",
            RecognizerId::KrRrn => "KR_RRN",
            RecognizerId::FiPersonalIdentityCode => "FI_PERSONAL_IDENTITY_CODE",
            RecognizerId::CreditCard => "CREDIT_CARD",
            RecognizerId::Iban => "IBAN",
            RecognizerId::Crypto => "CRYPTO",
            RecognizerId::Email => "EMAIL",
            RecognizerId::Phone => "PHONE",
            RecognizerId::IpAddress => "IP_ADDRESS",
            RecognizerId::Url => "URL",
            RecognizerId::DateTime => "DATE_TIME",
            RecognizerId::Spacy => "SPACY",
            RecognizerId::Transformers => "TRANSFORMERS",
            RecognizerId::Stanza => "STANZA",
            RecognizerId::Gliner => "GLINER",
            RecognizerId::AzureAiLanguage => "AZURE_AI_LANGUAGE",
            RecognizerId::AzureHealthDeid => "AZURE_HEALTH_DEID",
        }
    }

    /// Whether construction needs a model file
    pub fn is_model_backed(&self) -> bool {
        matches!(
            self,
            RecognizerId::Spacy
                | RecognizerId::Transformers
                | RecognizerId::Stanza
                | RecognizerId::Gliner
        )
    }

    /// Whether this identifier names a remote detection service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            RecognizerId::AzureAiLanguage | RecognizerId::AzureHealthDeid
        )
    }
}

impl fmt::Display for RecognizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecognizerId {
    type Err = PiiError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_uppercase();
        RecognizerId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == name)
            .ok_or(PiiError::UnknownRecognizer(name))
    }
}

/// Named group of recognizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Indian,
    Us,
    Uk,
    Australia,
    Singapore,
    European,
    Financial,
    Contact,
    Standard,
    All,
}

impl Preset {
    /// Every preset in listing order
    pub const ALL: &'static [Preset] = &[
        Preset::Indian,
        Preset::Us,
        Preset::Uk,
        Preset::Australia,
        Preset::Singapore,
        Preset::European,
        Preset::Financial,
        Preset::Contact,
        Preset::Standard,
        Preset::All,
    ];

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Indian => "INDIAN",
            Preset::Us => "US",
            Preset::Uk => "UK",
            Preset::Australia => "AUSTRALIA",
            Preset::Singapore => "SINGAPORE",
            Preset::European => "EUROPEAN",
            Preset::Financial => "FINANCIAL",
            Preset::Contact => "CONTACT",
            Preset::Standard => "STANDARD",
            Preset::All => "ALL",
        }
    }

    /// Alternative names accepted for this preset
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Preset::Indian => &["INDIA"],
            Preset::Us => &["USA"],
            Preset::Australia => &["AU"],
            Preset::Singapore => &["SG"],
            Preset::European => &["EUROPE", "EU"],
            Preset::All => &["COMPREHENSIVE"],
            Preset::Uk | Preset::Financial | Preset::Contact | Preset::Standard => &[],
        }
    }

    /// Look up a preset by name or alias, ignoring case
    pub fn parse(name: &str) -> Option<Preset> {
        let name = name.trim().to_uppercase();
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name || p.aliases().contains(&name.as_str()))
    }

    /// Identifiers in this preset
    pub fn ids(&self) -> Vec<RecognizerId> {
        use RecognizerId::*;
        match self {
            Preset::Us => vec![
                UsSsn,
                UsPassport,
                UsDriverLicense,
                UsItin,
                UsBankAccount,
                UsAbaRouting,
                MedicalLicense,
            ],
            Preset::Indian => vec![InPan, InAadhaar, InVehicleRegistration, InPassport, InVoterId],
            Preset::Financial => vec![CreditCard, Iban, UsBankAccount, Crypto],
            Preset::Contact => vec![Email, Phone, IpAddress, Url],
            Preset::Uk => vec![UkNhs, UkNino],
            Preset::Australia => vec![AuAbn, AuAcn, AuTfn, AuMedicare],
            Preset::Singapore => vec![SgFin, SgUen],
            Preset::European => vec![
                EsNif,
                EsNie,
                ItDriverLicense,
                ItFiscalCode,
                ItIdentityCard,
                ItPassport,
                ItVatCode,
                PlPesel,
                FiPersonalIdentityCode,
                Iban,
            ],
            Preset::Standard => vec![CreditCard, Iban, Crypto, Email, Phone, IpAddress, Url, DateTime],
            Preset::All => list_all(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated preset names, used in error messages
pub fn available_presets() -> String {
    Preset::ALL
        .iter()
        .map(Preset::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every identifier in catalog order
pub fn list_all() -> Vec<RecognizerId> {
    RecognizerId::ALL.to_vec()
}

/// Expand a preset name (case-insensitive, aliases accepted)
pub fn expand_preset(name: &str) -> Result<Vec<RecognizerId>> {
    Preset::parse(name)
        .map(|preset| preset.ids())
        .ok_or_else(|| PiiError::UnknownPreset {
            name: name.to_string(),
            available: available_presets(),
        })
}

/// Preset names paired with their aliases
pub fn presets() -> Vec<(&'static str, &'static [&'static str])> {
    Preset::ALL.iter().map(|p| (p.name(), p.aliases())).collect()
}

/// Split names into catalogued identifiers and unknown names
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> (Vec<RecognizerId>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for name in names {
        match name.as_ref().parse::<RecognizerId>() {
            Ok(id) => valid.push(id),
            Err(_) => invalid.push(name.as_ref().to_string()),
        }
    }
    (valid, invalid)
}

/// Build the recognizer for `id`
pub fn construct(id: RecognizerId, config: &EngineConfig) -> Result<Box<dyn Recognizer>> {
    let pattern = |built: Result<PatternRecognizer>| -> Result<Box<dyn Recognizer>> {
        Ok(Box::new(built?.context_window(config.context_words)))
    };

    match id {
        RecognizerId::UsSsn => pattern(us::ssn()),
        RecognizerId::UsPassport => pattern(us::passport()),
        RecognizerId::UsDriverLicense => pattern(us::driver_license()),
        RecognizerId::UsItin => pattern(us::itin()),
        RecognizerId::UsBankAccount => pattern(us::bank_account()),
        RecognizerId::UsAbaRouting => pattern(us::aba_routing()),
        RecognizerId::MedicalLicense => pattern(us::medical_license()),
        RecognizerId::UkNhs => pattern(uk::nhs()),
        RecognizerId::UkNino => pattern(uk::nino()),
        RecognizerId::InPan => pattern(india::pan()),
        RecognizerId::InAadhaar => pattern(india::aadhaar()),
        RecognizerId::InVehicleRegistration => pattern(india::vehicle_registration()),
        RecognizerId::InPassport => pattern(india::passport()),
        RecognizerId::InVoterId => pattern(india::voter_id()),
        RecognizerId::SgFin => pattern(apac::sg_fin()),
        RecognizerId::SgUen => pattern(apac::sg_uen()),
        RecognizerId::AuAbn => pattern(apac::au_abn()),
        RecognizerId::AuAcn => pattern(apac::au_acn()),
        RecognizerId::AuTfn => pattern(apac::au_tfn()),
        RecognizerId::AuMedicare => pattern(apac::au_medicare()),
        RecognizerId::KrRrn => pattern(apac::kr_rrn()),
        RecognizerId::EsNif => pattern(europe::es_nif()),
        RecognizerId::EsNie => pattern(europe::es_nie()),
        RecognizerId::ItDriverLicense => pattern(europe::it_driver_license()),
        RecognizerId::ItFiscalCode => pattern(europe::it_fiscal_code()),
        RecognizerId::ItIdentityCard => pattern(europe::it_identity_card()),
        RecognizerId::ItPassport => pattern(europe::it_passport()),
        RecognizerId::ItVatCode => pattern(europe::it_vat_code()),
        RecognizerId::PlPesel => pattern(europe::pl_pesel()),
        RecognizerId::FiPersonalIdentityCode => pattern(europe::fi_personal_identity_code()),
        RecognizerId::CreditCard => pattern(financial::credit_card()),
        RecognizerId::Iban => pattern(financial::iban()),
        RecognizerId::Crypto => pattern(financial::crypto()),
        RecognizerId::Email => pattern(contact::email()),
        RecognizerId::Phone => pattern(contact::phone()),
        RecognizerId::IpAddress => pattern(contact::ip_address()),
        RecognizerId::Url => pattern(contact::url()),
        RecognizerId::DateTime => pattern(datetime::date_time()),
        RecognizerId::Spacy
        | RecognizerId::Transformers
        | RecognizerId::Stanza
        | RecognizerId::Gliner => Ok(Box::new(NerRecognizer::load(id, config)?)),
        RecognizerId::AzureAiLanguage | RecognizerId::AzureHealthDeid => {
            Err(PiiError::RecognizerUnavailable {
                recognizer: id.to_string(),
                reason: "remote recognizers are not available in this engine".to_string(),
            })
        }
    }
}

/// Build a recognizer from its identifier string
pub fn construct_by_name(name: &str, config: &EngineConfig) -> Result<Box<dyn Recognizer>> {
    construct(name.parse()?, config)
}
