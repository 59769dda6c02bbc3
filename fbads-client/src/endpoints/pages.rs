//! Page posts.
//!
//! Posting to a page is a two-step pipeline. The page's own token comes from
//! [`AdsClient::resolve_page_token`], which is always a live call; the post
//! request built here carries that token and can be executed live or, when
//! it has no files, described into a batch.
//!
//! [`AdsClient::resolve_page_token`]: crate::AdsClient::resolve_page_token

use crate::client::PageToken;
use fbads_core::{AdsError, AdsResult, ApiRequest, EndpointSpec, FileUpload, Param, Values, ACCESS_TOKEN};

const CREATE_LINK_PAGE_POST: EndpointSpec = EndpointSpec::post(&[
    Param::plain("link").required(),
    Param::plain(ACCESS_TOKEN).required(),
    Param::plain("message"),
    Param::plain("picture"),
    Param::plain("published"),
    Param::plain("name"),
    Param::plain("caption"),
    Param::plain("description"),
]);
const CREATE_VIDEO_PAGE_POST: EndpointSpec = EndpointSpec::post(&[
    Param::plain("published").required(),
    Param::plain(ACCESS_TOKEN).required(),
    Param::plain("title"),
    Param::plain("description"),
    Param::plain("scheduled_publish_time"),
]);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagePost {
    pub link: String,
    pub message: Option<String>,
    pub picture: Option<String>,
    pub thumbnail: Option<FileUpload>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

impl LinkPagePost {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPagePost {
    pub source: FileUpload,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumb: Option<FileUpload>,
    pub published: bool,
    /// Unix timestamp; only meaningful for unpublished posts.
    pub scheduled_publish_time: Option<i64>,
}

impl VideoPagePost {
    pub fn new(source: impl Into<FileUpload>) -> Self {
        Self {
            source: source.into(),
            title: None,
            description: None,
            thumb: None,
            published: true,
            scheduled_publish_time: None,
        }
    }
}

fn check_token(page_id: &str, token: &PageToken) -> AdsResult<()> {
    if token.page_id != page_id {
        return Err(AdsError::precondition(format!(
            "page token belongs to page {}, not {}",
            token.page_id, page_id
        )));
    }
    Ok(())
}

pub fn create_link_page_post(
    page_id: &str,
    token: &PageToken,
    post: LinkPagePost,
) -> AdsResult<ApiRequest> {
    check_token(page_id, token)?;
    let request = CREATE_LINK_PAGE_POST.bind(
        format!("{}/feed", page_id),
        Values::new()
            .set("link", &post.link)
            .set(ACCESS_TOKEN, &token.access_token)
            .set_opt("message", post.message.as_deref())
            .set_opt("picture", post.picture.as_deref())
            .set_opt("published", post.published)
            .set_opt("name", post.name.as_deref())
            .set_opt("caption", post.caption.as_deref())
            .set_opt("description", post.description.as_deref()),
    )?;
    Ok(match post.thumbnail {
        Some(thumbnail) => request.with_file("thumbnail", thumbnail),
        None => request,
    })
}

pub fn create_video_page_post(
    page_id: &str,
    token: &PageToken,
    post: VideoPagePost,
) -> AdsResult<ApiRequest> {
    check_token(page_id, token)?;
    let request = CREATE_VIDEO_PAGE_POST
        .bind(
            format!("{}/videos", page_id),
            Values::new()
                .set("published", &post.published)
                .set(ACCESS_TOKEN, &token.access_token)
                .set_opt("title", post.title.as_deref())
                .set_opt("description", post.description.as_deref())
                .set_opt("scheduled_publish_time", post.scheduled_publish_time),
        )?
        .with_file("source", post.source);
    Ok(match post.thumb {
        Some(thumb) => request.with_file("thumb", thumb),
        None => request,
    })
}
