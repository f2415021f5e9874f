/// Icon class used when a link is saved without one.
pub const DEFAULT_ICON: &str = "fas fa-link";

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// A saved link as it appears in the store file. Missing fields take their
/// defaults so hand-edited or partial records still load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Default for Link {
    fn default() -> Link {
        Link {
            id: 0,
            title: String::new(),
            url: String::new(),
            description: String::new(),
            icon: default_icon(),
            category: String::new(),
            image_url: String::new(),
        }
    }
}

impl Link {
    /// Builds a record from submitted form fields, applying the form defaults.
    pub fn from_form(id: i64, form: LinkForm) -> Link {
        let icon = match form.icon {
            Some(icon) if !icon.trim().is_empty() => icon,
            _ => default_icon(),
        };
        Link {
            id,
            title: form.title,
            url: form.url,
            description: form.description,
            icon,
            category: form.category,
            image_url: form.image_url.unwrap_or_default(),
        }
    }
}

/// Fields of the add/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkForm {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: String,
    #[serde(rename = "image-url", default)]
    pub image_url: Option<String>,
}

impl From<&Link> for LinkForm {
    fn from(link: &Link) -> LinkForm {
        LinkForm {
            title: link.title.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
            icon: Some(link.icon.clone()),
            category: link.category.clone(),
            image_url: Some(link.image_url.clone()),
        }
    }
}

/// Body the client posts to the persistence endpoint.
#[derive(Serialize)]
pub struct SaveRequest<'a> {
    pub links: &'a [Link],
    pub action: &'static str,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
