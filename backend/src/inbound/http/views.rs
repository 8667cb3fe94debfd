//! Server-rendered HTML for the blog pages and admin forms.
//!
//! All user-supplied text passes through [`escape_html`].

use crate::domain::{Comment, Post};
use crate::inbound::http::session::SessionUser;

/// Escape text for use in element content and quoted attribute values.
///
/// # Examples
/// ```
/// use backend::inbound::http::views::escape_html;
///
/// assert_eq!(escape_html(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Per-request page chrome: who is signed in and where they can sign in.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    /// Signed-in user, shown in the header with a sign-out link.
    pub user: Option<&'a SessionUser>,
    /// Configured OAuth provider names, offered as sign-in links.
    pub providers: &'a [&'a str],
}

impl Layout<'_> {
    fn render(&self, title: &str, content: &str) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        html.push_str("</head>\n<body>\n<header>\n<nav><a href=\"/\">Home</a>");
        html.push_str(&self.user.map_or_else(|| self.sign_in_links(), signed_in_links));
        html.push_str("</nav>\n</header>\n<main>\n");
        html.push_str(content);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn sign_in_links(&self) -> String {
        self.providers
            .iter()
            .map(|provider| {
                let name = escape_html(provider);
                format!(" | <a href=\"/{name}/login\">Sign in with {name}</a>")
            })
            .collect()
    }
}

fn signed_in_links(user: &SessionUser) -> String {
    format!(
        " | Signed in as {} | <a href=\"/admin/createpost\">New post</a> | <a href=\"/admin/signout\">Sign out</a>",
        escape_html(&user.name)
    )
}

/// Index page listing every post.
#[must_use]
pub fn render_index(layout: Layout<'_>, posts: &[Post]) -> String {
    let mut content = String::from("<h1>Posts</h1>\n");
    if posts.is_empty() {
        content.push_str("<p>No posts yet.</p>\n");
    } else {
        content.push_str("<ul class=\"posts\">\n");
        for post in posts {
            let id = post.id;
            content.push_str(&format!(
                "<li><a href=\"/{id}\">{}</a>",
                escape_html(&post.title)
            ));
            if layout.user.is_some() {
                content.push_str(&format!(
                    " <a href=\"/admin/{id}/editpost\">Edit</a> <a href=\"/admin/{id}/deletepost\">Delete</a>"
                ));
            }
            content.push_str("</li>\n");
        }
        content.push_str("</ul>\n");
    }
    layout.render("Posts", &content)
}

/// A post with its comments; signed-in users also get the comment form.
#[must_use]
pub fn render_post(layout: Layout<'_>, post: &Post, comments: &[Comment]) -> String {
    let mut content = format!(
        "<article>\n<h1>{}</h1>\n<div class=\"body\">{}</div>\n</article>\n",
        escape_html(&post.title),
        escape_html(&post.body)
    );
    content.push_str(&format!(
        "<section class=\"comments\">\n<h2>Comments ({})</h2>\n",
        comments.len()
    ));
    for comment in comments {
        content.push_str(&format!(
            "<div class=\"comment\" id=\"comment-{}\">\n<p class=\"author\">{} &lt;{}&gt;</p>\n<p>{}</p>\n</div>\n",
            comment.id,
            escape_html(&comment.name),
            escape_html(&comment.email),
            escape_html(&comment.body)
        ));
    }
    if let Some(user) = layout.user {
        content.push_str(&format!(
            "<form method=\"post\" action=\"/admin/{}/addcomment\">\n",
            post.id
        ));
        content.push_str(&format!(
            "<input type=\"text\" name=\"name\" value=\"{}\">\n",
            escape_html(&user.name)
        ));
        content.push_str(&format!(
            "<input type=\"email\" name=\"email\" value=\"{}\">\n",
            escape_html(&user.email)
        ));
        content.push_str("<textarea name=\"body\"></textarea>\n");
        content.push_str("<button type=\"submit\">Add comment</button>\n</form>\n");
    }
    content.push_str("</section>\n");
    layout.render(&post.title, &content)
}

/// Create or edit form posting to `action`, prefilled from `post`.
#[must_use]
pub fn render_post_form(layout: Layout<'_>, action: &str, post: Option<&Post>) -> String {
    let (heading, title, body) = post.map_or(("New post", "", ""), |existing| {
        ("Edit post", existing.title.as_str(), existing.body.as_str())
    });
    let mut content = format!("<h1>{heading}</h1>\n");
    content.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape_html(action)
    ));
    content.push_str(&format!(
        "<input type=\"text\" name=\"title\" value=\"{}\">\n",
        escape_html(title)
    ));
    content.push_str(&format!(
        "<textarea name=\"body\">{}</textarea>\n",
        escape_html(body)
    ));
    content.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout.render(heading, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn post() -> Post {
        Post {
            user_id: 1,
            id: 3,
            title: "<script>alert(1)</script>".to_owned(),
            body: "Fish & chips".to_owned(),
        }
    }

    fn ada() -> SessionUser {
        SessionUser {
            id: 1,
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
        }
    }

    const PROVIDERS: &[&str] = &["facebook", "google"];

    #[rstest]
    fn index_escapes_titles_and_links_posts(post: Post) {
        let html = render_index(Layout { user: None, providers: PROVIDERS }, &[post]);
        assert!(html.contains("<a href=\"/3\">&lt;script&gt;alert(1)&lt;/script&gt;</a>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("href=\"/google/login\""));
        assert!(!html.contains("/admin/3/deletepost"));
    }

    #[rstest]
    fn index_shows_admin_links_when_signed_in(post: Post) {
        let user = ada();
        let html = render_index(Layout { user: Some(&user), providers: PROVIDERS }, &[post]);
        assert!(html.contains("/admin/3/editpost"));
        assert!(html.contains("/admin/signout"));
        assert!(!html.contains("/google/login"));
    }

    #[rstest]
    fn comment_form_requires_a_user(post: Post) {
        let anonymous = render_post(Layout { user: None, providers: PROVIDERS }, &post, &[]);
        assert!(!anonymous.contains("/admin/3/addcomment"));

        let user = ada();
        let signed_in = render_post(Layout { user: Some(&user), providers: PROVIDERS }, &post, &[]);
        assert!(signed_in.contains("action=\"/admin/3/addcomment\""));
        assert!(signed_in.contains("value=\"ada@example.com\""));
    }

    #[rstest]
    fn post_page_lists_escaped_comments(post: Post) {
        let comment = Comment {
            post_id: 3,
            id: 9,
            name: "Bob".to_owned(),
            email: "bob@example.com".to_owned(),
            body: "<b>hi</b>".to_owned(),
        };
        let html = render_post(Layout { user: None, providers: &[] }, &post, &[comment]);
        assert!(html.contains("Comments (1)"));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("Fish &amp; chips"));
    }

    #[rstest]
    fn edit_form_is_prefilled(post: Post) {
        let html = render_post_form(
            Layout { user: None, providers: &[] },
            "/admin/3/editpost",
            Some(&post),
        );
        assert!(html.contains("action=\"/admin/3/editpost\""));
        assert!(html.contains("<textarea name=\"body\">Fish &amp; chips</textarea>"));
    }
}
