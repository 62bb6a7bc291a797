//! Built-in component kinds.
//!
//! Each submodule turns effective parameters into an inner HTML fragment.
//! Positioning is added afterwards by the component renderer.

mod button;
mod card;
mod footer;
mod image;
mod template;
mod testimonial;
mod text_block;

pub(crate) use template::fill_template;

use sf_model::ComponentDefinition;

use crate::escape::url_attr;
use crate::{ComponentError, Params};

/// Transparent 1x1 GIF shown until the page script swaps in `data-src`.
const LAZY_PLACEHOLDER: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// `src` attributes for an `<img>`.
///
/// Lazy images carry their URL in `data-src` and load once scrolled near.
pub(crate) fn image_source(url: &str, lazy: bool) -> String {
    if lazy {
        format!(
            r#"src="{LAZY_PLACEHOLDER}" data-src="{}" loading="lazy""#,
            url_attr(url)
        )
    } else {
        format!(r#"src="{}" loading="eager""#, url_attr(url))
    }
}

/// Strategy for rendering one component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    TextBlock,
    Image,
    Button,
    Footer,
    Testimonial,
    PrimeCard,
    /// Any other type: the definition's HTML template is filled in.
    Template,
}

impl ComponentKind {
    /// Select the strategy for an instance type.
    #[must_use]
    pub fn from_type(component_type: &str) -> Self {
        match component_type {
            "text-block" => Self::TextBlock,
            "image" => Self::Image,
            "button" => Self::Button,
            "footer" => Self::Footer,
            "testimonial" => Self::Testimonial,
            "prime-card-001" => Self::PrimeCard,
            _ => Self::Template,
        }
    }

    /// Produce the inner fragment.
    pub(crate) fn render(
        self,
        params: Params<'_>,
        definition: Option<&ComponentDefinition>,
        component_type: &str,
    ) -> Result<String, ComponentError> {
        match self {
            Self::TextBlock => text_block::render(params),
            Self::Image => image::render(params),
            Self::Button => button::render(params),
            Self::Footer => footer::render(params),
            Self::Testimonial => testimonial::render(params),
            Self::PrimeCard => card::render(params),
            Self::Template => {
                let template = definition
                    .and_then(|d| d.html_template.as_deref())
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| {
                        ComponentError::MissingTemplate(
                            definition.map_or_else(|| component_type.to_owned(), |d| d.id.clone()),
                        )
                    })?;
                Ok(fill_template(template, params))
            }
        }
    }
}
