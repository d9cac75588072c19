//! Read the Eqori blog.
//!
//! The blog is public: no session required, no guard.

use clap::Subcommand;

use eqori_client::EqoriClient;
use eqori_client::blog::DEFAULT_BLOG_LIMIT;

use crate::commands::CommandError;
use crate::screen;

#[derive(Debug, Subcommand)]
pub enum BlogAction {
    /// List published articles, newest first
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Articles to skip (pagination)
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum articles to list
        #[arg(long, default_value_t = DEFAULT_BLOG_LIMIT)]
        limit: u32,
    },
    /// List the categories that have published articles
    Categories,
    /// Render one article
    Show {
        /// Article slug (from `blog list`)
        slug: String,
    },
}

pub async fn run(client: &EqoriClient, action: &BlogAction) -> Result<(), CommandError> {
    match action {
        BlogAction::List {
            category,
            skip,
            limit,
        } => {
            let posts = client
                .blog()
                .list(*skip, *limit, category.as_deref())
                .await?;
            if posts.is_empty() {
                println!("No articles published yet.");
                return Ok(());
            }
            for post in &posts {
                screen::print_post_row(post);
            }
        }
        BlogAction::Categories => {
            for category in client.blog().categories().await? {
                println!("{category}");
            }
        }
        BlogAction::Show { slug } => {
            let post = client.blog().get(slug).await?;
            screen::print_post(&post);
        }
    }
    Ok(())
}
