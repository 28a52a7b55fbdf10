/*!

This is the long-form manual for `spectrum_core` and `specauction`.

## Dataset formats

The following formats are supported:
* `json` a versioned JSON file (default)
* `xlsx` an Excel workbook with one worksheet per band

### `json`

```text
{
  "version": "2023-24",
  "ceilings": { "800MHz": 20.0, "900MHz": 35.0 },
  "bands": {
    "800MHz": [
      { "region": "Andhra Pradesh", "blocks": 8, "quantum_mhz": 10.0 },
      { "region": "Bihar", "blocks": 8, "quantum_mhz": 10.0 }
    ],
    "26GHz": [
      { "region": "Andhra Pradesh", "quantum_mhz": 400.0 }
    ]
  }
}
```

The keys of `bands` are band identifiers: a number followed by `MHz` or `GHz`.
The order of the keys does not matter, bands are always reported by increasing frequency.
The order of the allocations inside a band is kept.

`blocks` is optional: the tables for the high frequency bands only publish the quantum.
`ceilings` is optional. When a ceiling is given for a band, any allocation above it is rejected.

The 2023-24 auction tables ship with `specauction` and are used when no file is provided.

### `xlsx`

One worksheet per band, named after the band identifier. The first row is a header.
The columns are:

| Region         | Blocks | Quantum (MHz) |
|----------------|--------|---------------|
| Andhra Pradesh | 8      | 10            |
| Bihar          | 8      | 10            |

Blank rows are skipped. An empty `Blocks` cell means that the number of blocks is not published.

An optional worksheet named `ceilings` gives the ceiling of each band, one `Band | Ceiling (MHz)`
row per band. As with the `json` format, an allocation above the ceiling of its band is rejected.

## Regions

Region names are compared exactly. The auction tables are not consistent across bands:
`Uttar Pradesh (West)` only appears in some of them, and both `Kolkata` and `West Bengal`
are listed. No attempt is made to reconcile them: `Kolkata` and `West Bengal` are treated
as two circles.

When tables are joined, every region seen in any of the requested bands gets a record
and the missing bands are filled with 0. With `--strict`, asking for a region that no
table knows about is an error instead.

## Strategies

| name           | weights                              |
|----------------|--------------------------------------|
| `conservative` | 800 MHz 0.5, 900 MHz 0.5             |
| `balanced`     | 800 MHz 0.3, 900 MHz 0.3, 1800 MHz 0.4 |
| `aggressive`   | 1800 MHz 0.4, 3300 MHz 0.6           |
| `future-ready` | 3300 MHz 0.4, 26 GHz 0.6             |

The priority score of a region is the weighted sum of its quantums.

## Opportunity matrix

* coverage: mean of 800 MHz and 900 MHz
* capacity: mean of 1800 MHz and a tenth of 3300 MHz
* future: a hundredth of 26 GHz
* total: mean of the three scores

The high priority regions are the ones with a total strictly above the 75th percentile.

## Views

* `summary` total quantum per band, share of each band, number of circles
* `band` allocations of one band (`--band`), distribution summary and top regions
* `compare` selected regions (`--regions`) across selected bands (`--bands`), with totals and market shares.
  Without `--bands`, all the bands are shown but the totals and shares leave out the millimetre wave
  bands (24 GHz and above)
* `opportunities` the opportunity matrix
* `strategy` top regions for a strategy (`--strategy`)

All views print JSON. Use `--out` to write it to a file and `--reference` to check it
against a previously saved output.

 */
