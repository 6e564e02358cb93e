use natc_ir::{Program, Reg, VReg};
use natc_utils::keyvec::{Key, KeyVec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Blank,
    Def,
    Use,
    Live,
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Cell::Blank => ' ',
            Cell::Def => 'v',
            Cell::Use => '+',
            Cell::Live => '|',
        }
    }

    pub fn is_blank(self) -> bool {
        self == Cell::Blank
    }
}

/// An instruction × register occupancy chart, one row per program node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart<R: Key> {
    rows: Vec<KeyVec<R, Cell>>,
    width: usize,
}

impl<R: Key> Chart<R> {
    pub fn new(rows: usize, width: usize) -> Self {
        Self {
            rows: vec![KeyVec::from_elem(Cell::Blank, width); rows],
            width,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, reg: R) -> Cell {
        self.rows[row][reg]
    }

    pub fn set(&mut self, row: usize, reg: R, cell: Cell) {
        self.rows[row][reg] = cell;
    }

    pub fn row(&self, row: usize) -> &KeyVec<R, Cell> {
        &self.rows[row]
    }

    pub fn render_row(&self, row: usize) -> String {
        self.rows[row].iter().map(|cell| cell.glyph()).collect()
    }

    /// The cells of `reg` in every row, top to bottom.
    pub fn column(&self, reg: R) -> impl Iterator<Item = Cell> + '_ {
        self.rows.iter().map(move |row| row[reg])
    }
}

/// Build the def-use chart of a lowered program with `vreg_count` registers.
///
/// A register is `Def` where its tuple sits, `Use` wherever a later tuple reads
/// it, and `Live` on the blank rows in between.
pub fn analyze(program: &Program, vreg_count: usize) -> Chart<VReg> {
    let mut chart = Chart::new(program.len(), vreg_count);

    for (def_row, def) in program.tuples() {
        let Some(vreg) = def.dest.as_ssa() else {
            continue;
        };
        chart.set(def_row, vreg, Cell::Def);

        for (use_row, user) in program.tuples().skip_while(|&(row, _)| row <= def_row) {
            if user.operands().any(|reg| reg == Reg::Ssa(vreg)) {
                mark_use(&mut chart, def_row, use_row, vreg);
            }
        }
    }

    log::debug!(
        "liveness chart: {} rows x {} registers",
        chart.rows(),
        chart.width()
    );

    chart
}

fn mark_use(chart: &mut Chart<VReg>, def_row: usize, use_row: usize, vreg: VReg) {
    chart.set(use_row, vreg, Cell::Use);

    for row in (def_row + 1..use_row).rev() {
        if !chart.get(row, vreg).is_blank() {
            break;
        }
        chart.set(row, vreg, Cell::Live);
    }
}

