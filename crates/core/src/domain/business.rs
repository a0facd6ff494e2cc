use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl BusinessId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Closed set of supported verticals. Selects the default vocabulary used to
/// personalize prompts and tool descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Dental,
    Medical,
    Salon,
    Fitness,
    Automotive,
    Legal,
    HomeServices,
    Restaurant,
    Retail,
    Other,
}

impl Industry {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dental" => Self::Dental,
            "medical" => Self::Medical,
            "salon" => Self::Salon,
            "fitness" => Self::Fitness,
            "automotive" => Self::Automotive,
            "legal" => Self::Legal,
            "home_services" => Self::HomeServices,
            "restaurant" => Self::Restaurant,
            "retail" => Self::Retail,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dental => "dental",
            Self::Medical => "medical",
            Self::Salon => "salon",
            Self::Fitness => "fitness",
            Self::Automotive => "automotive",
            Self::Legal => "legal",
            Self::HomeServices => "home_services",
            Self::Restaurant => "restaurant",
            Self::Retail => "retail",
            Self::Other => "other",
        }
    }

    pub fn default_terms(&self) -> VocabularyTerms {
        let (customer, appointment, service) = match self {
            Self::Dental | Self::Medical => ("patient", "appointment", "treatment"),
            Self::Salon => ("client", "appointment", "service"),
            Self::Fitness => ("member", "session", "class"),
            Self::Legal => ("client", "consultation", "service"),
            Self::Restaurant => ("guest", "reservation", "offering"),
            Self::Retail => ("customer", "appointment", "product"),
            Self::Automotive | Self::HomeServices | Self::Other => {
                ("customer", "appointment", "service")
            }
        };
        VocabularyTerms {
            customer: customer.to_string(),
            appointment: appointment.to_string(),
            service: service.to_string(),
        }
    }
}

/// The three terms that personalize generated language. A dental practice
/// books a "patient" for a "treatment"; a gym books a "member" for a "class".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTerms {
    pub customer: String,
    pub appointment: String,
    pub service: String,
}

impl Default for VocabularyTerms {
    fn default() -> Self {
        Industry::Other.default_terms()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.city.is_empty() && self.state.is_empty()
    }

    /// Single-line rendering used in prompts and public pages.
    pub fn render(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ] {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub weekdays: String,
    pub saturday: String,
    pub sunday: String,
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self {
            weekdays: "9:00 AM - 5:00 PM".to_string(),
            saturday: "Closed".to_string(),
            sunday: "Closed".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    pub title: String,
    pub bio: String,
}

/// Three hex colors driving the public page theme. Always present; the
/// compiler and renderer never have to handle a missing palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".to_string(),
            secondary_color: "#1e40af".to_string(),
            accent_color: "#f59e0b".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub price: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub author: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub rating: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub owner_user_id: UserId,
    /// Unique per store. Treated as immutable once a public URL has been
    /// shared; the store adapter never updates it after creation.
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub industry: Industry,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: Address,
    pub hours: WeeklyHours,
    pub staff: StaffMember,
    pub branding: Branding,
    pub terms: VocabularyTerms,
    pub services: Vec<ServiceOffering>,
    pub faqs: Vec<FaqEntry>,
    pub testimonials: Vec<Testimonial>,
    pub knowledge: Vec<KnowledgeEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn new(owner_user_id: UserId, name: impl Into<String>, industry: Industry) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: BusinessId::generate(),
            owner_user_id,
            slug: slugify(&name),
            name,
            tagline: String::new(),
            description: String::new(),
            industry,
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            address: Address::default(),
            hours: WeeklyHours::default(),
            staff: StaffMember::default(),
            branding: Branding::default(),
            terms: industry.default_terms(),
            services: Vec::new(),
            faqs: Vec::new(),
            testimonials: Vec::new(),
            knowledge: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercase, alphanumeric-and-hyphen slug. Collisions are resolved by the
/// store adapter with a numeric suffix, not here.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("business");
    }
    slug
}
