use virtual_rows::{
    Align, FixedHeightCalculator, RangeCalculator, calculate_total_height, calculate_visible_range,
};

fn main() {
    let (count, item_height, container) = (1_000_000usize, 24u32, 720u32);

    let range = calculate_visible_range(123_456, container, count, item_height, 3);
    println!("total_height={}", calculate_total_height(count, item_height));
    println!("visible_range={range:?} rows={}", range.len());

    FixedHeightCalculator.for_each_item(range, item_height, |index, pos| {
        if index == range.start {
            println!("first row {index} at top={} height={}", pos.top, pos.height);
        }
    });

    let offset = FixedHeightCalculator.scroll_to_index_offset(
        999_999,
        Align::End,
        123_456,
        container,
        count,
        item_height,
    );
    println!("scroll_to_index(999_999, End) -> offset={offset}");
}
