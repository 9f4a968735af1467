//! Subcommand implementations
//!
//! Each subcommand maps onto one [`IwaraApi`] operation and prints the
//! resulting [`Response`] as pretty JSON.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use iwara_core::{
    CommentPostParam, IwaraApi, MediaQueryParam, MediaType, Response, Session, SortType,
    VideoDetailOutcome,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaArg {
    Video,
    Image,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Video => MediaType::Video,
            MediaArg::Image => MediaType::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortArg {
    #[default]
    Date,
    Views,
    Likes,
}

impl From<SortArg> for SortType {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortType::Date,
            SortArg::Views => SortType::Views,
            SortArg::Likes => SortType::Likes,
        }
    }
}

/// Page a comment is posted on
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CommentTarget {
    Video,
    User,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and print the session token
    Login { email: String, password: String },
    /// Profile of the logged-in account
    Me,
    /// Uploads of followed users
    Subscriptions {
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Video detail
    Video { id: String },
    /// Image detail
    Image { id: String },
    /// Comments under a video or image
    Comments {
        #[arg(value_enum)]
        media: MediaArg,
        id: String,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Site-wide video or image listing
    List {
        #[arg(value_enum)]
        media: MediaArg,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
        #[arg(short, long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,
        /// Filter code such as `created:2021`, repeatable
        #[arg(short, long)]
        filter: Vec<String>,
    },
    /// Public profile of a user
    User { id: String },
    /// Uploads of a user, by numeric media id
    UserMedia {
        id: String,
        #[arg(value_enum)]
        media: MediaArg,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Comments on a user's profile
    UserComments {
        id: String,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Full-text search
    Search {
        query: String,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
        #[arg(short, long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,
        #[arg(short, long)]
        filter: Vec<String>,
    },
    /// Media the logged-in account liked
    Liked {
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Like a video through its like link
    Like {
        link: String,
        /// Remove the like instead
        #[arg(long)]
        undo: bool,
    },
    /// Follow a user through their follow link
    Follow {
        link: String,
        /// Unfollow instead
        #[arg(long)]
        undo: bool,
    },
    /// Post a comment on a video or a user profile
    Comment {
        #[arg(value_enum)]
        target: CommentTarget,
        id: String,
        content: String,
        /// Comment id to reply to
        #[arg(long)]
        parent: Option<i64>,
    },
}

/// Runs one subcommand, returning whether it succeeded
pub async fn run(api: &IwaraApi, session: &Session, command: Command) -> Result<bool> {
    match command {
        Command::Login { email, password } => print(&api.login(&email, &password).await),
        Command::Me => print(&api.get_self(session).await),
        Command::Subscriptions { page } => print(&api.get_subscription_list(session, page).await),
        Command::Video { id } => print(&api.get_video_page_detail(session, &id).await),
        Command::Image { id } => print(&api.get_image_page_detail(session, &id).await),
        Command::Comments { media, id, page } => {
            print(&api.get_comment_list(session, media.into(), &id, page).await)
        }
        Command::List {
            media,
            page,
            sort,
            filter,
        } => {
            let query = query_param(sort, filter);
            print(&api.get_media_list(session, media.into(), page, &query).await)
        }
        Command::User { id } => print(&api.get_user(session, &id).await),
        Command::UserMedia { id, media, page } => {
            print(&api.get_user_media_list(session, &id, media.into(), page).await)
        }
        Command::UserComments { id, page } => {
            print(&api.get_user_page_comment(session, &id, page).await)
        }
        Command::Search {
            query,
            page,
            sort,
            filter,
        } => {
            let params = query_param(sort, filter);
            print(&api.search(session, &query, page, &params).await)
        }
        Command::Liked { page } => print(&api.get_like_page(session, page).await),
        Command::Like { link, undo } => print(&api.like(session, !undo, &link).await),
        Command::Follow { link, undo } => print(&api.follow(session, !undo, &link).await),
        Command::Comment {
            target,
            id,
            content,
            parent,
        } => {
            let (nid, param) = match comment_form_of(api, session, target, &id).await {
                Response::Success(form) => form,
                Response::Failure(message) => return print(&Response::<()>::Failure(message)),
            };
            info!(nid, "Submitting comment");
            print(&api.post_comment(session, nid, parent, &content, &param).await)
        }
    }
}

/// Node id and form tokens to post a comment on a video or user page
async fn comment_form_of(
    api: &IwaraApi,
    session: &Session,
    target: CommentTarget,
    id: &str,
) -> Response<(i64, CommentPostParam)> {
    let found = match target {
        CommentTarget::Video => match api.get_video_page_detail(session, id).await {
            Response::Success(VideoDetailOutcome::Found(video)) => {
                let nid = video.nid;
                Ok(video.comment_post_param.map(|param| (nid, param)))
            }
            Response::Success(outcome) => Err(format!("Video is not available: {:?}", outcome)),
            Response::Failure(message) => Err(message),
        },
        CommentTarget::User => match api.get_user(session, id).await {
            Response::Success(user) => {
                let nid = user.comment_nid;
                Ok(user.comment_post_param.map(|param| (nid, param)))
            }
            Response::Failure(message) => Err(message),
        },
    };

    match found {
        Ok(Some(form)) => Response::Success(form),
        Ok(None) => Response::failure("Page has no comment form, log in first"),
        Err(message) => Response::Failure(message),
    }
}

fn query_param(sort: SortArg, filters: Vec<String>) -> MediaQueryParam {
    filters
        .into_iter()
        .fold(MediaQueryParam::new(sort.into()), |query, code| {
            query.with_filter(code)
        })
}

fn print<T: Serialize>(response: &Response<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(response.is_success())
}
