//! HTML fragments for the link grid, the admin list and the expanded card.
//!
//! Every function here is a pure projection of its arguments. Field values
//! are escaped before they are placed in markup.

use crate::models::Link;

const NO_RESULTS: &str = r#"<div class="no-results glass-panel">
    <i class="fas fa-search"></i>
    <h3>No links found</h3>
    <p>Try a different search term</p>
</div>
"#;

const NO_LINKS: &str = r#"<div class="no-links glass-panel">
    <i class="fas fa-link"></i>
    <h3>No links added yet</h3>
    <p>Add your first link using the "Add Link" tab</p>
</div>
"#;

/// Handler attached to a button in the admin list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub action: &'static str,
    pub id: i64,
}

/// Admin list markup together with the handlers its buttons need. The
/// buttons are recreated on every render, so callers replace their previous
/// bindings with these.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminList {
    pub html: String,
    pub bindings: Vec<Binding>,
}

/// Grid of cards, or the "no results" placeholder when `links` is empty.
pub fn render_links(links: &[&Link]) -> String {
    if links.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut html = String::new();
    for link in links {
        html.push_str(&format!(
            r#"<div class="link-card" data-id="{id}">
    <div class="link-icon"><i class="{icon}"></i></div>
    <h3>{title}</h3>
    <p>{description}</p>
    <div class="link-meta"><span class="link-category">{category}</span></div>
    <a href="{url}" target="_blank" class="glass-button"><i class="fas fa-external-link-alt"></i> Visit</a>
</div>
"#,
            id = link.id,
            icon = escape(&link.icon),
            title = escape(&link.title),
            description = escape(&link.description),
            category = escape(&link.category),
            url = escape(&link.url),
        ));
    }
    html
}

/// Admin panel list with edit and delete buttons for each record.
pub fn render_link_list(links: &[Link]) -> AdminList {
    if links.is_empty() {
        return AdminList {
            html: NO_LINKS.to_string(),
            bindings: Vec::new(),
        };
    }

    let mut list = AdminList::default();
    for link in links {
        let image = if link.image_url.is_empty() {
            String::new()
        } else {
            format!(
                r#"<img src="{}" class="link-item-image" alt="{} preview">"#,
                escape(&link.image_url),
                escape(&link.title)
            )
        };
        list.html.push_str(&format!(
            r#"<div class="link-item glass-panel">
    <div class="link-item-header">
        <div class="link-item-icon"><i class="{icon}"></i></div>
        <h4>{title}</h4>
        <span class="link-item-category">{category}</span>
    </div>
    <p class="link-item-desc">{description}</p>
    {image}
    <div class="link-item-actions">
        <button class="edit-link glass-button" data-id="{id}"><i class="fas fa-edit"></i> Edit</button>
        <button class="delete-link glass-button" data-id="{id}"><i class="fas fa-trash"></i> Delete</button>
    </div>
</div>
"#,
            id = link.id,
            icon = escape(&link.icon),
            title = escape(&link.title),
            category = escape(&link.category),
            description = escape(&link.description),
        ));
        list.bindings.push(Binding {
            action: "edit",
            id: link.id,
        });
        list.bindings.push(Binding {
            action: "delete",
            id: link.id,
        });
    }
    list
}

/// Detail overlay for a single card. The image preview only appears when the
/// record has an image URL.
pub fn render_expanded(link: &Link) -> String {
    let preview = if link.image_url.is_empty() {
        r#"<img id="link-preview-image" style="display: none">"#.to_string()
    } else {
        format!(
            r#"<img id="link-preview-image" src="{}" style="display: block">"#,
            escape(&link.image_url)
        )
    };
    format!(
        r#"<div class="expanded-view-overlay active">
    <i id="expanded-icon" class="{icon}"></i>
    <h2 id="expanded-title">{title}</h2>
    <span id="expanded-category">{category}</span>
    <a id="expanded-url" href="{url}" target="_blank">Visit</a>
    <p id="expanded-description">{description}</p>
    {preview}
</div>
"#,
        icon = escape(&link.icon),
        title = escape(&link.title),
        category = escape(&link.category),
        url = escape(&link.url),
        description = escape(&link.description),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::link;

    #[test]
    fn empty_grid_shows_placeholder() {
        let html = render_links(&[]);
        assert!(html.contains("No links found"));
        assert!(!html.contains("link-card"));
    }

    #[test]
    fn one_card_per_link_in_order() {
        let a = link(1, "Alpha", "Tools");
        let b = link(2, "Beta", "Docs");
        let html = render_links(&[&a, &b]);
        assert_eq!(html.matches("class=\"link-card\"").count(), 2);
        assert!(html.find("Alpha").unwrap() < html.find("Beta").unwrap());
        assert!(html.contains(r#"href="https://example.com/1""#));
    }

    #[test]
    fn markup_in_fields_is_escaped() {
        let mut sneaky = link(1, "<script>alert(1)</script>", "A&B");
        sneaky.url = r#"https://x" onclick="boom"#.to_string();
        let html = render_links(&[&sneaky]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A&amp;B"));
        assert!(!html.contains(r#"" onclick=""#));
    }

    #[test]
    fn admin_list_binds_edit_and_delete_per_record() {
        let links = vec![link(4, "Four", "A"), link(5, "Five", "B")];
        let list = render_link_list(&links);
        assert_eq!(
            list.bindings,
            vec![
                Binding { action: "edit", id: 4 },
                Binding { action: "delete", id: 4 },
                Binding { action: "edit", id: 5 },
                Binding { action: "delete", id: 5 },
            ]
        );
        assert_eq!(list.html.matches("class=\"edit-link").count(), 2);
    }

    #[test]
    fn admin_list_shows_image_only_when_present() {
        let mut with_image = link(1, "Pic", "A");
        with_image.image_url = "https://img.example/p.png".to_string();
        let list = render_link_list(&[with_image, link(2, "NoPic", "B")]);
        assert_eq!(list.html.matches("link-item-image").count(), 1);
    }

    #[test]
    fn empty_admin_list_has_no_bindings() {
        let list = render_link_list(&[]);
        assert!(list.html.contains("No links added yet"));
        assert!(list.bindings.is_empty());
    }

    #[test]
    fn expanded_view_hides_missing_preview() {
        let plain = link(1, "Plain", "A");
        assert!(render_expanded(&plain).contains("display: none"));

        let mut pictured = plain.clone();
        pictured.image_url = "https://img.example/p.png".to_string();
        let html = render_expanded(&pictured);
        assert!(html.contains("display: block"));
        assert!(html.contains("https://img.example/p.png"));
    }
}
