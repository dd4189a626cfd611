use super::*;

#[test]
fn each_role_gets_its_own_panels() {
    let farmer = dashboard_sections(Role::Farmer);
    let supplier = dashboard_sections(Role::Supplier);
    let consumer = dashboard_sections(Role::Consumer);

    assert_eq!(farmer[0].0, "My Produce Listings");
    assert_eq!(supplier[0].0, "Supply Catalog");
    assert_eq!(consumer[0].0, "Browse Produce");
    assert_ne!(farmer, supplier);
    assert_ne!(supplier, consumer);
}

#[test]
fn unknown_roles_see_the_consumer_panels() {
    assert_eq!(dashboard_sections(Role::Unknown), dashboard_sections(Role::Consumer));
}
