//! The regex-based strategy on the sample files

use ashdsl::ash::ast::FileKind;
use ashdsl::ash::parsers::{ParseStrategy, SimpleParser};
use ashdsl::ash::testing::{assert_result, Samples};

fn parse_sample(name: &str) -> ashdsl::ash::ast::ParseResult {
    SimpleParser.parse(&Samples::get_string(name).unwrap())
}

#[test]
fn test_empty_input() {
    assert_result(&SimpleParser.parse(""))
        .not_ash()
        .module_name("")
        .parser("SimpleParser");
}

#[test]
fn test_whitespace_and_comments_only() {
    assert_result(&SimpleParser.parse("\n\n   # use Ash.Resource\n\t\n")).not_ash();
}

#[test]
fn test_controller_is_rejected() {
    assert_result(&parse_sample("phoenix_controller.ex"))
        .not_ash()
        .module_name("MyAppWeb.PageController");
}

#[test]
fn test_resource_sections() {
    assert_result(&parse_sample("post_resource.ex"))
        .is_ash()
        .kind(FileKind::Resource)
        .module_name("MyApp.Blog.Post")
        .section_names(&["postgres", "attributes", "relationships", "actions", "calculations"])
        .section_named("postgres", |pg| {
            pg.at(7, 2)
                .closed()
                .child(0, |table| table.keyword("table").name("posts"))
        })
        .section_named("calculations", |calc| {
            calc.child(0, |c| c.keyword("calculate").name(":excerpt"))
        });
}

#[test]
fn test_domain_kind() {
    assert_result(&parse_sample("blog_domain.ex"))
        .is_ash()
        .kind(FileKind::Domain)
        .section_names(&["resources", "authorization"]);
}

#[test]
fn test_enum_definition() {
    assert_result(&parse_sample("status_enum.ex"))
        .is_ash()
        .kind(FileKind::TypeEnum)
        .section_names(&["enum_definition"])
        .section(0, |section| {
            section
                .is_statement()
                .at(1, 2)
                .child_count(3)
                .child(0, |v| v.keyword("value").name(":draft").at(3, 6))
                .child(2, |v| v.name(":archived").at(5, 6))
        });
}

#[test]
fn test_unterminated_input_recovers() {
    assert_result(&parse_sample("unterminated.ex"))
        .is_ash()
        .section_count(1)
        .section(0, |attrs| {
            attrs
                .keyword("attributes")
                .unclosed()
                .child_count(2)
                .child(1, |a| a.name(":name"))
        });
}

#[test]
fn test_reactor_is_not_a_marker() {
    assert_result(&parse_sample("signup_reactor.ex")).not_ash();
}

#[test]
fn test_first_token_wins_for_names() {
    let source = "use Ash.Resource\nactions do\n  read get_by_subject do\n  end\n  read :by_id do\n  end\nend\n";
    assert_result(&SimpleParser.parse(source)).section(0, |actions| {
        actions
            .child(0, |read| read.name("get_by_subject"))
            .child(1, |read| read.name(":by_id"))
    });
}
