use serde_json::json;

use crate::catalog::model::{EndpointPair, RequestSpec};
use crate::config::RunConfig;

/// GraphQL document fetching a package's pull counts and dependency graph.
const PACKAGE_DETAILS_QUERY: &str = "\
query package($orgName: String!, $packageName: String!, $version: String!) {
    package(orgName: $orgName, packageName: $packageName, version: $version) {
        totalPullCount
        packageDependencies {
            organization
            name
            version
        },
        dependentPackages {
            organization
            name
            version
        }
        dailyPullCount {
            pullDate
            pullCount
        }
    }
}";

/// User-Agent string the update-tool endpoints key their responses on.
const UPDATE_TOOL_USER_AGENT: &str = "ballerina/slalpha5 (linux-64) Updater/1.3.1";

/// Build the fixed catalog of endpoint pairs for one run.
///
/// Every pair hits the same path on both deployments; only the base URL
/// differs. Pairs that need credentials are included only when the matching
/// token (and user id) is present in the configuration, so an anonymous run
/// still covers the public surface.
pub fn builtin(config: &RunConfig) -> Vec<EndpointPair> {
    let a = &config.baseline_base_url;
    let b = &config.candidate_base_url;

    let mut pairs = Vec::new();

    // --- public registry surface ---

    pairs.push(EndpointPair::new(
        "package_versions",
        RequestSpec::get(format!("{a}/registry/packages/ballerina/http")),
        RequestSpec::get(format!("{b}/registry/packages/ballerina/http")),
    ));

    pairs.push(EndpointPair::new(
        "package_details",
        RequestSpec::get(format!("{a}/registry/packages/ballerina/http/2.8.0")),
        RequestSpec::get(format!("{b}/registry/packages/ballerina/http/2.8.0")),
    ));

    let resolve_body = json!({
        "packages": [
            {"org": "ballerina", "name": "io", "version": "1.4.1", "mode": "medium"},
            {"org": "ballerina", "name": "log", "version": "2.7.1", "mode": "medium"},
            {"org": "ballerina", "name": "time", "version": "2.2.4", "mode": "medium"},
            {"org": "ballerina", "name": "cache", "version": "3.5.0", "mode": "medium"},
            {"org": "ballerina", "name": "auth", "version": "2.8.0", "mode": "medium"},
            {"org": "ballerina", "name": "http", "version": "2.8.0", "mode": "medium"},
            {"org": "ballerina", "name": "oauth2", "version": "2.8.0", "mode": "medium"},
            {"org": "ballerina", "name": "crypto", "version": "2.3.1", "mode": "medium"},
            {"org": "ballerina", "name": "url", "version": "2.2.4", "mode": "medium"},
        ]
    })
    .to_string();
    pairs.push(EndpointPair::new(
        "resolve_package_dependencies",
        RequestSpec::post_json(
            format!("{a}/registry/packages/resolve-dependencies"),
            resolve_body.clone(),
        ),
        RequestSpec::post_json(
            format!("{b}/registry/packages/resolve-dependencies"),
            resolve_body,
        ),
    ));

    let search_query = "q=org:ballerina&offset=0&limit=10&readme=false&sort=relevance,DESC";
    pairs.push(EndpointPair::new(
        "search_packages",
        RequestSpec::get(format!("{a}/registry/search-packages?{search_query}")),
        RequestSpec::get(format!("{b}/registry/search-packages?{search_query}")),
    ));

    pairs.push(EndpointPair::new(
        "search_package_symbols",
        RequestSpec::get(format!("{a}/registry/search-symbols?{search_query}")),
        RequestSpec::get(format!("{b}/registry/search-symbols?{search_query}")),
    ));

    pairs.push(EndpointPair::new(
        "package_search_suggestions",
        RequestSpec::get(format!("{a}/registry/search-suggestions?q=goog&mode=all")),
        RequestSpec::get(format!("{b}/registry/search-suggestions?q=goog&mode=all")),
    ));

    let graphql_body = json!({
        "query": PACKAGE_DETAILS_QUERY,
        "variables": {
            "orgName": "ballerina",
            "packageName": "graphql",
            "version": "1.16.0",
        }
    })
    .to_string();
    pairs.push(EndpointPair::new(
        "graphql_package_details",
        RequestSpec::post_json(format!("{a}/graphql"), graphql_body.clone())
            .with_header("Accept", "application/json"),
        RequestSpec::post_json(format!("{b}/graphql"), graphql_body)
            .with_header("Accept", "application/json"),
    ));

    // --- authenticated user/organization surface ---

    if config.has_registry_credentials() {
        let user = &config.user_id;
        let token = &config.registry_token;

        pairs.push(EndpointPair::new(
            "organizations_of_user",
            RequestSpec::get(format!("{a}/users/{user}/organizations")).with_bearer(token),
            RequestSpec::get(format!("{b}/users/{user}/organizations")).with_bearer(token),
        ));

        if !config.org_name.is_empty() {
            let org = &config.org_name;
            pairs.push(EndpointPair::new(
                "users_of_organization",
                RequestSpec::get(format!("{a}/organizations/{org}/users")).with_bearer(token),
                RequestSpec::get(format!("{b}/organizations/{org}/users")).with_bearer(token),
            ));
            pairs.push(EndpointPair::new(
                "invitations_of_organization",
                RequestSpec::get(format!("{a}/organizations/{org}/invitations"))
                    .with_bearer(token),
                RequestSpec::get(format!("{b}/organizations/{org}/invitations"))
                    .with_bearer(token),
            ));
        }
    }

    if config.has_frontend_credentials() {
        let user = &config.user_id;
        let token = &config.frontend_token;
        pairs.push(EndpointPair::new(
            "asgardeo_organizations_of_user",
            RequestSpec::get(format!("{a}/users/{user}/organizations/asgardeo"))
                .with_bearer(token),
            RequestSpec::get(format!("{b}/users/{user}/organizations/asgardeo"))
                .with_bearer(token),
        ));
    }

    // --- update-tool surface (responses vary by updater User-Agent) ---

    pairs.push(EndpointPair::new(
        "list_of_distributions",
        RequestSpec::get(format!("{a}/update-tool/distributions"))
            .with_header("User-Agent", UPDATE_TOOL_USER_AGENT),
        RequestSpec::get(format!("{b}/update-tool/distributions"))
            .with_header("User-Agent", UPDATE_TOOL_USER_AGENT),
    ));

    pairs.push(EndpointPair::new(
        "update_tool_versions",
        RequestSpec::get(format!("{a}/update-tool/update/versions"))
            .with_header("User-Agent", UPDATE_TOOL_USER_AGENT),
        RequestSpec::get(format!("{b}/update-tool/update/versions"))
            .with_header("User-Agent", UPDATE_TOOL_USER_AGENT),
    ));

    pairs
}
