use pl_core::Result;
use pl_object::{Runtime, Variables, INT_NA};

/// Collects garbage, then prints the heap report if asked to.
fn collect(runtime: &mut Runtime, report: bool) -> Result<()> {
    let collection = runtime.collect()?;
    println!(
        "collected: {} reachable, {} swept ({} bytes)",
        collection.reachable, collection.swept, collection.bytes_swept
    );
    if report {
        runtime.print_report();
    }
    Ok(())
}

/// Replays a short session of an R-like program against the runtime.
pub fn run(rt: &mut Runtime, report: bool) -> Result<()> {
    let mut vars = Variables::new();

    // v <- c(1, 2, 3)
    let v = rt.new_vector(&[1i32, 2, 3])?;
    vars.set(rt, "v", v, 0)?;

    // v <- c(4, 5, 6)
    let v = rt.new_vector(&[4i32, 5, 6])?;
    vars.set(rt, "v", v, 0)?;

    // l <- list(c('a', 'b', 'c'), c(1, 2, 3, NA))
    let chars = rt.new_string("abc")?;
    let ints = rt.new_vector(&[1i32, 2, 3, INT_NA])?;
    let l = rt.new_vector(&[Some(chars), Some(ints)])?;
    vars.set(rt, "l", l, 0)?;

    // print(c(4) %in% v)
    let needle = rt.new_vector(&[4i32])?;
    let v = vars.get(rt, "v", 0)?;
    let found = rt.is_in(needle, v)?;
    rt.print(found)?;

    // print(v[c(1, 3, 3, 2)])
    let indices = rt.new_vector(&[0i32, 2, 2, 1])?;
    let subset = rt.subset_with(v, indices)?;
    rt.print(subset)?;

    // print(v[[1]])
    let first = rt.new_vector(&[0i32])?;
    let element = rt.extract_with(v, first)?;
    rt.print(element)?;

    // print(l[[1]]), print(l[[2]])
    let l = vars.get(rt, "l", 0)?;
    let element = rt.extract_with(l, first)?;
    rt.print(element)?;
    let second = rt.new_vector(&[1i32])?;
    let element = rt.extract_with(l, second)?;
    rt.print(element)?;

    // l <- append(l, v); print(l)
    rt.append(l, v)?;
    rt.print(l)?;

    // l2 <- l
    let l2 = rt.copy(l)?;
    vars.set(rt, "l2", l2, 0)?;
    rt.print_report();

    for name in ["l2", "l", "v"] {
        vars.delete(rt, name, 0)?;
        collect(rt, true)?;
    }
    if report {
        println!("{:#?}", rt.heap().stats());
    }
    Ok(())
}
