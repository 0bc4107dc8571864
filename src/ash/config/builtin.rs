//! Built-in Ash configurations
//!
//! Resource configurations include the sections contributed by the common Ash
//! extensions (AshAuthentication, AshPostgres, AshGraphql, ...). Extensions are
//! listed under a resource's `extensions:` option and are never matched as
//! modules of their own, so their sections live on the resource entry.

use super::{DetailShape, ModuleConfiguration, NameShape, SectionShape};
use crate::ash::ast::FileKind;

fn bare(keyword: &str) -> DetailShape {
    DetailShape::new(keyword, NameShape::Bare)
}

fn single(keyword: &str) -> DetailShape {
    DetailShape::new(keyword, NameShape::Single)
}

fn positional(keyword: &str) -> DetailShape {
    DetailShape::new(keyword, NameShape::Positional)
}

fn singles(keywords: &[&str]) -> Vec<DetailShape> {
    keywords.iter().map(|k| single(k)).collect()
}

fn section(keyword: &str, details: Vec<DetailShape>) -> SectionShape {
    SectionShape::new(keyword, details)
}

pub(super) fn configurations() -> Vec<ModuleConfiguration> {
    vec![
        ModuleConfiguration::new(
            "Ash.Resource",
            "Ash Resource",
            Some(FileKind::Resource),
            resource_sections(),
        ),
        ModuleConfiguration::new(
            "Ash.Domain",
            "Ash Domain",
            Some(FileKind::Domain),
            domain_sections("domain"),
        ),
        ModuleConfiguration::new(
            "Ash.Api",
            "Ash Api (legacy domain)",
            Some(FileKind::Domain),
            domain_sections("api"),
        ),
        ModuleConfiguration::new(
            "Ash.Type.Enum",
            "Ash Enum Type",
            Some(FileKind::TypeEnum),
            Vec::new(),
        ),
        ModuleConfiguration::new(
            "Reactor",
            "Reactor",
            Some(FileKind::Reactor),
            reactor_sections(),
        ),
        ModuleConfiguration::new(
            "Spark.Dsl.Fragment",
            "Spark DSL Fragment",
            Some(FileKind::Fragment),
            resource_sections(),
        ),
    ]
}

fn attribute_options() -> Vec<DetailShape> {
    singles(&[
        "allow_nil?",
        "default",
        "update_default",
        "constraints",
        "public?",
        "writable?",
        "primary_key?",
        "generated?",
        "sensitive?",
        "description",
        "source",
    ])
}

fn argument() -> DetailShape {
    positional("argument").with_children(singles(&[
        "allow_nil?",
        "default",
        "constraints",
        "public?",
        "sensitive?",
        "description",
    ]))
}

fn action_body() -> Vec<DetailShape> {
    let mut body = vec![
        argument(),
        single("accept"),
        single("reject"),
        single("change"),
        single("validate"),
        single("prepare"),
        single("filter"),
        single("get?"),
        single("get_by"),
        single("primary?"),
        single("manual"),
        single("run"),
        single("returns"),
        single("upsert?"),
        single("upsert_identity"),
        single("upsert_fields"),
        single("soft?"),
        single("require_atomic?"),
        single("require_attributes"),
        single("allow_nil_input"),
        single("description"),
        single("transaction?"),
        positional("metadata"),
    ];
    body.push(bare("pagination").with_children(singles(&[
        "offset?",
        "keyset?",
        "countable",
        "default_limit",
        "max_page_size",
        "required?",
    ])));
    body
}

fn policy_checks() -> Vec<DetailShape> {
    singles(&[
        "authorize_if",
        "forbid_if",
        "authorize_unless",
        "forbid_unless",
        "description",
        "access_type",
    ])
}

fn resource_sections() -> Vec<SectionShape> {
    vec![
        section("resource", singles(&[
            "description",
            "short_name",
            "plural_name",
            "base_filter",
            "default_context",
            "require_primary_key?",
            "trace_name",
        ])),
        section("attributes", vec![
            single("uuid_primary_key").with_children(attribute_options()),
            single("uuid_v7_primary_key").with_children(attribute_options()),
            single("integer_primary_key").with_children(attribute_options()),
            single("attribute").with_children(attribute_options()),
            single("create_timestamp").with_children(attribute_options()),
            single("update_timestamp").with_children(attribute_options()),
            bare("timestamps"),
        ]),
        section("relationships", ["belongs_to", "has_one", "has_many", "many_to_many"]
            .iter()
            .map(|k| {
                positional(k).with_children(singles(&[
                    "source_attribute",
                    "destination_attribute",
                    "source_attribute_on_join_resource",
                    "destination_attribute_on_join_resource",
                    "through",
                    "join_relationship",
                    "allow_nil?",
                    "attribute_type",
                    "attribute_writable?",
                    "primary_key?",
                    "public?",
                    "domain",
                    "filter",
                    "sort",
                    "read_action",
                    "no_attributes?",
                    "define_attribute?",
                    "description",
                ]))
            })
            .collect()),
        section("actions", {
            let mut details = vec![bare("defaults"), positional("default_accept")];
            details.extend(
                ["create", "read", "update", "destroy", "action"]
                    .iter()
                    .map(|k| single(k).with_children(action_body())),
            );
            details
        }),
        section("calculations", vec![positional("calculate").with_children(vec![
            argument(),
            single("public?"),
            single("load"),
            single("filterable?"),
            single("sortable?"),
            single("description"),
        ])]),
        section("aggregates", ["count", "sum", "first", "list", "max", "min", "avg", "exists", "custom"]
            .iter()
            .map(|k| {
                positional(k).with_children(singles(&[
                    "filter",
                    "sort",
                    "field",
                    "uniq?",
                    "default",
                    "public?",
                    "description",
                ]))
            })
            .collect()),
        section("identities", vec![positional("identity").with_children(singles(&[
            "eager_check?",
            "pre_check?",
            "nils_distinct?",
            "where",
            "message",
        ]))]),
        section("validations", vec![single("validate").with_children(singles(&[
            "where",
            "on",
            "message",
            "only_when_valid?",
            "before_action?",
        ]))]),
        section("changes", vec![single("change").with_children(singles(&[
            "where",
            "on",
            "only_when_valid?",
            "description",
        ]))]),
        section("preparations", vec![single("prepare").with_children(singles(&["where", "on"]))]),
        section("code_interface", vec![
            single("domain"),
            single("define").with_children(singles(&[
                "action", "args", "get?", "get_by", "get_by_identity", "not_found_error?",
            ])),
            single("define_calculation").with_children(singles(&["calculation", "args"])),
        ]),
        section("policies", vec![
            single("policy").with_children(policy_checks()),
            single("bypass").with_children(policy_checks()),
            single("policy_group").with_children(vec![single("policy").with_children(policy_checks())]),
            single("default_access_type"),
        ]),
        section("field_policies", vec![
            positional("field_policy").with_children(policy_checks()),
            positional("field_policy_bypass").with_children(policy_checks()),
        ]),
        section("multitenancy", singles(&["strategy", "attribute", "global?", "parse_attribute"])),
        section("authentication", vec![
            single("subject_name"),
            single("domain"),
            single("session_identifier"),
            single("select_for_senders"),
            bare("tokens").with_children(singles(&[
                "enabled?",
                "token_resource",
                "signing_secret",
                "store_all_tokens?",
                "require_token_presence_for_authentication?",
                "token_lifetime",
            ])),
            bare("strategies").with_children(authentication_strategies()),
            bare("add_ons").with_children(vec![
                single("confirmation").with_children(singles(&[
                    "monitor_fields",
                    "confirm_on_create?",
                    "confirm_on_update?",
                    "sender",
                    "inhibit_updates?",
                ])),
                single("log_out_everywhere"),
            ]),
        ]),
        section("postgres", vec![
            single("table"),
            single("repo"),
            single("schema"),
            single("migrate?"),
            single("polymorphic?"),
            single("identity_index_names"),
            single("migration_types"),
            bare("references").with_children(vec![
                single("reference").with_children(singles(&["on_delete", "on_update", "name"])),
                single("polymorphic_on_delete"),
            ]),
            bare("custom_indexes").with_children(vec![single("index")]),
            bare("check_constraints").with_children(vec![positional("check_constraint")]),
            bare("custom_statements").with_children(vec![
                single("statement").with_children(singles(&["up", "down"])),
            ]),
        ]),
        section("sqlite", vec![
            single("table"),
            single("repo"),
            bare("references").with_children(vec![single("reference")]),
            bare("custom_indexes").with_children(vec![single("index")]),
        ]),
        section("graphql", vec![
            single("type"),
            single("derive_filter?"),
            single("derive_sort?"),
            bare("queries").with_children(
                ["get", "list", "read_one", "action"].iter().map(|k| positional(k)).collect(),
            ),
            bare("mutations").with_children(
                ["create", "update", "destroy", "action"].iter().map(|k| positional(k)).collect(),
            ),
            bare("subscriptions").with_children(vec![single("subscribe").with_children(singles(&[
                "action_types",
                "read_action",
                "actor",
            ]))]),
        ]),
        section("json_api", vec![
            single("type"),
            single("includes"),
            bare("routes").with_children(vec![
                single("base"),
                positional("get"),
                positional("index"),
                positional("post"),
                positional("patch"),
                positional("delete"),
                positional("related"),
                positional("relationship"),
            ]),
            bare("primary_key").with_children(singles(&["keys", "delimiter"])),
        ]),
        section("state_machine", vec![
            single("initial_states"),
            single("default_initial_state"),
            single("state_attribute"),
            bare("transitions").with_children(vec![positional("transition")]),
        ]),
        section("pub_sub", vec![
            single("module"),
            single("prefix"),
            single("broadcast_type"),
            positional("publish"),
            positional("publish_all"),
        ]),
        section("archive", singles(&["attribute", "base_filter?", "exclude_read_actions", "exclude_destroy_actions"])),
        section("paper_trail", vec![
            single("change_tracking_mode"),
            single("store_action_name?"),
            single("ignore_attributes"),
            single("mixin"),
            positional("belongs_to_actor"),
        ]),
        section("token", vec![
            single("domain"),
            single("expunge_expired_action_name"),
            single("get_token_action_name"),
            bare("revocation").with_children(singles(&[
                "revoke_token_action_name",
                "is_revoked_action_name",
            ])),
        ]),
    ]
}

fn authentication_strategies() -> Vec<DetailShape> {
    let mut strategies = vec![
        single("password").with_children(vec![
            single("identity_field"),
            single("hashed_password_field"),
            single("hash_provider"),
            single("confirmation_required?"),
            single("register_action_accept"),
            single("sign_in_tokens_enabled?"),
            bare("resettable").with_children(singles(&["sender", "token_lifetime"])),
        ]),
        single("magic_link").with_children(singles(&[
            "identity_field",
            "sender",
            "registration_enabled?",
            "require_interaction?",
            "token_lifetime",
        ])),
        single("api_key").with_children(singles(&["api_key_relationship", "api_key_hash_attribute"])),
    ];
    strategies.extend(
        ["oauth2", "github", "google", "auth0", "apple", "oidc", "slack"]
            .iter()
            .map(|k| {
                single(k).with_children(singles(&[
                    "client_id",
                    "client_secret",
                    "redirect_uri",
                    "base_url",
                    "authorize_url",
                    "token_url",
                    "user_url",
                    "registration_enabled?",
                ]))
            }),
    );
    strategies
}

fn domain_sections(own_section: &str) -> Vec<SectionShape> {
    vec![
        section(own_section, singles(&["description", "short_name", "trace_name"])),
        section("resources", vec![
            single("resource").with_children(vec![
                single("define").with_children(singles(&["action", "args", "get?", "get_by"])),
                single("define_calculation").with_children(singles(&["calculation", "args"])),
            ]),
            single("allow"),
            single("allow_unregistered?"),
        ]),
        section("authorization", singles(&["authorize", "require_actor?"])),
        section("execution", singles(&["timeout"])),
        section("graphql", vec![
            single("authorize?"),
            bare("queries").with_children(
                ["get", "list", "read_one", "action"].iter().map(|k| positional(k)).collect(),
            ),
            bare("mutations").with_children(
                ["create", "update", "destroy", "action"].iter().map(|k| positional(k)).collect(),
            ),
        ]),
        section("json_api", vec![
            bare("routes").with_children(vec![positional("base_route").with_children(
                ["get", "index", "post", "patch", "delete", "related"]
                    .iter()
                    .map(|k| positional(k))
                    .collect(),
            )]),
        ]),
        section("admin", singles(&["show?", "name"])),
    ]
}

fn reactor_step_body() -> Vec<DetailShape> {
    vec![
        positional("argument"),
        single("run"),
        single("compensate"),
        single("undo"),
        single("max_retries"),
        single("async?"),
        single("wait_for"),
        single("where"),
        single("guard"),
        single("impl"),
    ]
}

fn reactor_sections() -> Vec<SectionShape> {
    let step = || positional("step").with_children(reactor_step_body());
    vec![
        section("step", reactor_step_body()),
        section("map", vec![single("source"), positional("argument"), single("batch_size"), step()]),
        section("group", vec![single("before_all"), single("after_all"), positional("argument"), step()]),
        section("around", vec![positional("argument"), step()]),
        section("switch", vec![
            single("on"),
            positional("matches?").with_children(vec![step()]),
            bare("default").with_children(vec![step()]),
        ]),
        section("compose", vec![positional("argument")]),
        section("collect", vec![positional("argument"), single("transform")]),
        section("debug", vec![positional("argument"), single("level")]),
        section("reactor", singles(&["description"])),
    ]
}
