//! GitHub suite.
//!
//! A single dependency chain: fetch a user, then that user's repositories,
//! then a named repository's file listing, then the README content. Each
//! nested Scope reads variables captured by its ancestors, so a failure at
//! any level skips everything below it. The archive download is a sibling of
//! the file-listing Scope; both depend on the repository lookup.

use std::sync::Arc;

use serde_json::{Value, json};
use sonda_application::{HttpClient, Scope, Vars, require_var};
use sonda_domain::{
    AuthScheme, CallSpec, expect_eq, expect_exists, expect_ne, expect_subset,
};

use super::{find_by_name, md5_hex, string_at};

const BASE_URL: &str = "https://api.github.com";
const USERNAME: &str = "aperdomob";
const EXPECTED_REPOSITORY: &str = "jasmine-awesome-report";

/// Known md5 of the repository's README content.
const README_MD5: &str = "8a406064ca4738447ec522e639f828bf";
/// md5 of zero bytes; an archive hashing to this is an empty download.
const EMPTY_CONTENT_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Builds the GitHub suite.
#[must_use]
pub fn suite(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("given a user logged in github").with_child(user_scope(client))
}

fn user_scope(client: Arc<dyn HttpClient>) -> Scope {
    let setup_client = Arc::clone(&client);

    Scope::new(format!("when get {USERNAME} user"))
        .with_setup(move |_vars| {
            let client = Arc::clone(&setup_client);
            async move {
                let spec = CallSpec::get(format!("{BASE_URL}/users/{USERNAME}"))
                    .with_auth(AuthScheme::Token);
                let response = client.call(&spec).await?;

                let mut captured = Vars::new();
                captured.insert("user".to_string(), response.json_or_empty());
                Ok(captured)
            }
        })
        .with_check("user name is loaded", |vars| {
            expect_eq(
                "user.name",
                vars.get("user").and_then(|u| u.pointer("/name")),
                &json!("Alejandro Perdomo"),
            )
        })
        .with_check("user company is loaded", |vars| {
            expect_eq(
                "user.company",
                vars.get("user").and_then(|u| u.pointer("/company")),
                &json!("PSL"),
            )
        })
        .with_check("user location is loaded", |vars| {
            expect_eq(
                "user.location",
                vars.get("user").and_then(|u| u.pointer("/location")),
                &json!("Colombia"),
            )
        })
        .with_child(repositories_scope(client))
}

fn repositories_scope(client: Arc<dyn HttpClient>) -> Scope {
    let setup_client = Arc::clone(&client);

    Scope::new(format!("when get {USERNAME} repositories"))
        .with_setup(move |vars| {
            let client = Arc::clone(&setup_client);
            async move {
                let user = require_var(&vars, "user")?;
                let repos_url = string_at(user, "/repos_url", "user.repos_url")?;
                let response = client
                    .call(&CallSpec::get(repos_url).with_auth(AuthScheme::Token))
                    .await?;

                let repositories = response.json_or_empty();
                let repository =
                    find_by_name(&repositories, EXPECTED_REPOSITORY).unwrap_or(Value::Null);

                let mut captured = Vars::new();
                captured.insert("repository".to_string(), repository);
                Ok(captured)
            }
        })
        .with_check(format!("has the {EXPECTED_REPOSITORY} repository"), |vars| {
            expect_exists("repository", vars.get("repository"))
        })
        .with_check("repository full name matches", |vars| {
            expect_eq(
                "repository.full_name",
                vars.get("repository").and_then(|r| r.pointer("/full_name")),
                &json!("aperdomob/jasmine-awesome-report"),
            )
        })
        .with_check("repository is public", |vars| {
            expect_eq(
                "repository.private",
                vars.get("repository").and_then(|r| r.pointer("/private")),
                &json!(false),
            )
        })
        .with_check("repository description matches", |vars| {
            expect_eq(
                "repository.description",
                vars.get("repository").and_then(|r| r.pointer("/description")),
                &json!("An awesome html report for Jasmine"),
            )
        })
        .with_child(contents_scope(Arc::clone(&client)))
        .with_child(download_scope(client))
}

fn contents_scope(client: Arc<dyn HttpClient>) -> Scope {
    let setup_client = Arc::clone(&client);

    Scope::new("when get path file list")
        .with_setup(move |vars| {
            let client = Arc::clone(&setup_client);
            async move {
                let repository = require_var(&vars, "repository")?;
                let repository_url = string_at(repository, "/url", "repository.url")?;
                let response = client
                    .call(
                        &CallSpec::get(format!("{repository_url}/contents"))
                            .with_auth(AuthScheme::Token),
                    )
                    .await?;

                let files = response.json_or_empty();
                let readme = find_by_name(&files, "README.md").unwrap_or(Value::Null);

                let mut captured = Vars::new();
                captured.insert("readme".to_string(), readme);
                Ok(captured)
            }
        })
        .with_check("has a README.md file", |vars| {
            expect_exists("readme", vars.get("readme"))
        })
        .with_check("README.md metadata matches", |vars| {
            expect_subset(
                "readme",
                vars.get("readme"),
                &json!({
                    "name": "README.md",
                    "path": "README.md",
                    "sha": "9bcf2527fd5cd12ce18e457581319a349f9a56f3"
                }),
            )
        })
        .with_child(file_content_scope(client))
}

fn file_content_scope(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new("when get the file content")
        .with_setup(move |vars| {
            let client = Arc::clone(&client);
            async move {
                let readme = require_var(&vars, "readme")?;
                let download_url = string_at(readme, "/download_url", "readme.download_url")?;
                // Raw downloads are served unauthenticated.
                let response = client.call(&CallSpec::get(download_url)).await?;

                let mut captured = Vars::new();
                captured.insert(
                    "readme_md5".to_string(),
                    json!(md5_hex(&response.body_bytes)),
                );
                Ok(captured)
            }
        })
        .with_check("downloaded content hashes to the known value", |vars| {
            expect_eq("readme_md5", vars.get("readme_md5"), &json!(README_MD5))
        })
}

fn download_scope(client: Arc<dyn HttpClient>) -> Scope {
    Scope::new(format!("when download {EXPECTED_REPOSITORY} main branch"))
        .with_setup(move |vars| {
            let client = Arc::clone(&client);
            async move {
                let repository = require_var(&vars, "repository")?;
                let svn_url = string_at(repository, "/svn_url", "repository.svn_url")?;
                let branch = string_at(
                    repository,
                    "/default_branch",
                    "repository.default_branch",
                )?;

                let spec = CallSpec::get(format!("{svn_url}/archive/{branch}.zip"))
                    .with_auth(AuthScheme::Token)
                    .buffered();
                let response = client.call(&spec).await?;

                let mut captured = Vars::new();
                captured.insert(
                    "archive_md5".to_string(),
                    json!(md5_hex(&response.body_bytes)),
                );
                Ok(captured)
            }
        })
        .with_check("downloaded archive is not empty", |vars| {
            expect_ne(
                "archive_md5",
                vars.get("archive_md5"),
                &json!(EMPTY_CONTENT_MD5),
            )
        })
}
