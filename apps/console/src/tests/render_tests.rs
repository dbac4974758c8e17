use console_core::ListController;
use serde_json::json;

use super::*;

fn members(count: usize) -> Vec<Member> {
    (1..=count)
        .map(|n| {
            serde_json::from_value(json!({
                "_id": format!("m{n}"),
                "name": format!("Member {n}"),
                "email": "m@example.com",
                "phone": "9876543210",
                "walletBalance": 12.5,
                "isBlocked": n == 2
            }))
            .expect("member")
        })
        .collect()
}

#[test]
fn columns_are_aligned() {
    let table = render_table(
        &["ID", "NAME"],
        &[
            vec!["m1".into(), "Asha".into()],
            vec!["m100".into(), "Ravi".into()],
        ],
    );
    assert_eq!(table, "ID    NAME\nm1    Asha\nm100  Ravi");
}

#[test]
fn page_footer_reports_position() {
    let mut list = ListController::<Member>::new(2);
    list.set_items(members(3));
    list.next_page();

    let rendered = render_page(&list.view());
    assert!(rendered.contains("m3"));
    assert!(!rendered.contains("m1 "));
    assert!(rendered.ends_with("page 2 of 2 (3 records)"));
}

#[test]
fn empty_page_says_so() {
    let mut list = ListController::<Member>::new(10);
    list.set_items(members(3));
    list.set_search("nobody");

    assert_eq!(render_page(&list.view()), "no results\n\npage 1 of 1 (0 records)");
}

#[test]
fn member_cells_format_amounts_and_flags() {
    let cells = members(2)[1].cells();
    assert_eq!(cells[0], "m2");
    assert_eq!(cells[5], "12.50");
    assert_eq!(cells[7], "yes");
    assert_eq!(cells.len(), Member::HEADERS.len());
}

#[test]
fn platform_wide_limit_shows_all_members() {
    let limit: TransactionLimit =
        serde_json::from_value(json!({ "id": "l1", "service": "AEPS", "maxAmount": 100 }))
            .expect("limit");
    let cells = limit.cells();
    assert_eq!(cells[2], "all members");
    assert_eq!(cells[4], "100.00");
}
