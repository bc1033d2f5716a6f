mod fixtures;

use territory_planner::input::PlannerConfig;
use territory_planner::planner::optimize;
use territory_planner::traits::SplitMix64;

use fixtures::three_cities::three_city_records;

#[test]
fn produces_a_complete_plan_without_a_provider() {
    let records = three_city_records((12, 12, 12));
    let config = PlannerConfig {
        locations_per_day: 10,
        num_zones: 3,
        num_groups: 1,
    };
    let mut rng = SplitMix64::new(1);

    let plan = optimize(&records, &config, None, &mut rng).expect("plan");

    assert_eq!(plan.zones.len(), 3);
    assert_eq!(plan.stats.geocoded_locations, 36);
    assert_eq!(plan.stats.zones_created, 3);
    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].total_locations, 36);

    let total: usize = plan.zones.iter().map(|z| z.locations.len()).sum();
    assert_eq!(total, 36);
}
