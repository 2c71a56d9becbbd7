use pl_core::{Class, Result};
use pl_object::Runtime;

/// Pins `count` lists, each holding a distinct int vector, collects, then unpins and collects
/// again.
pub fn run(rt: &mut Runtime, count: usize, report: bool) -> Result<()> {
    let mut lists = Vec::with_capacity(count);
    for value in 0..count {
        let ints = rt.new_vector(&[value as i32])?;
        let list = rt.allocate(Class::List, 1)?;
        rt.append(list, ints)?;
        lists.push(list);
    }
    rt.directly_reachable_many(&lists)?;

    let collection = rt.collect()?;
    println!(
        "pinned {} lists: {} objects tracked after collection ({} swept)",
        count,
        rt.tracked(),
        collection.swept
    );
    if report {
        rt.print_report();
    }

    rt.directly_unreachable_many(&lists)?;
    let collection = rt.collect()?;
    println!(
        "unpinned {} lists: {} objects tracked after collection ({} swept)",
        count,
        rt.tracked(),
        collection.swept
    );
    if report {
        rt.print_report();
    }
    println!("{:?}", rt.heap().stats());
    Ok(())
}
